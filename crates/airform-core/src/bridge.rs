//! Adapter between interaction decisions and the 3D object/scene services.
//!
//! Both the gesture interpreter and pointer input end up here, expressed in the
//! same small vocabulary: hit-test, grab, move, rotate, poke, remove, release.

use crate::input::{InputState, PointerAction, PointerEvent};
use crate::stroke::{Stroke, StrokeId};
use kurbo::{Point, Size, Vec2};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll, Waker};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for 3D objects.
pub type ObjectId = Uuid;

/// Object manager errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ObjectError {
    #[error("Degenerate polygon: {0}")]
    Degenerate(String),
    #[error("Unknown object: {0}")]
    UnknownObject(ObjectId),
    #[error("Object backend error: {0}")]
    Backend(String),
}

/// Result type for object operations.
pub type ObjectResult<T> = Result<T, ObjectError>;

/// Boxed future for async object operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// 3D object creation, manipulation and physics.
pub trait ObjectManager {
    /// Topmost object under a screen point.
    fn object_at_position(&self, point: Point) -> Option<ObjectId>;

    /// Solidify a closed stroke into a 3D object.
    fn create_from_stroke(&mut self, stroke: &Stroke) -> BoxFuture<'static, ObjectResult<ObjectId>>;

    fn poke_object(&mut self, id: ObjectId, point: Point);

    fn grab_object(&mut self, id: ObjectId, point: Point);

    fn release_object(&mut self, id: ObjectId);

    fn move_grabbed_object(&mut self, id: ObjectId, point: Point);

    /// Rotate by an angular delta (radians around the screen y and x axes).
    fn rotate_object(&mut self, id: ObjectId, delta: Vec2);

    fn remove_object(&mut self, id: ObjectId);

    /// Remove every object.
    fn clear_all(&mut self) -> BoxFuture<'static, ObjectResult<()>>;

    /// Advance physics by `delta_time` seconds.
    fn update(&mut self, delta_time: f64, elapsed: f64);

    fn object_count(&self) -> usize;
}

/// Camera and 3D render surface.
pub trait SceneSurface {
    fn orbit_camera(&mut self, delta: Vec2);

    /// Positive zooms in.
    fn zoom_camera(&mut self, delta: f64);

    /// Object hit by a ray through a screen point.
    fn raycast_objects(&self, point: Point) -> Option<ObjectId>;

    fn resize(&mut self, size: Size);

    fn render(&mut self);
}

/// Result of a finished async object operation.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    Solidified { stroke: StrokeId, object: ObjectId },
    SolidifyFailed { stroke: StrokeId, error: ObjectError },
    Cleared,
    ClearFailed(ObjectError),
}

/// What a pointer drag is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerDrag {
    /// Press started on an object: drag rotates it.
    Rotating(ObjectId),
    /// Press started on empty space: drag orbits the camera.
    Orbiting,
}

/// Routes interaction primitives to the object manager and scene.
pub struct InteractionBridge<O, S> {
    objects: O,
    scene: S,
    input: InputState,
    pointer_drag: Option<PointerDrag>,
    /// Object held by a gesture grab. At most one of this and a pointer
    /// rotation is active.
    gesture_grab: Option<ObjectId>,
    pending: Vec<BoxFuture<'static, TaskOutcome>>,
    /// Radians per pixel of drag.
    pub rotation_factor: f64,
    /// Zoom delta per wheel line.
    pub wheel_zoom_factor: f64,
    /// Zoom delta per pixel of two-finger spread.
    pub touch_zoom_factor: f64,
}

impl<O: ObjectManager, S: SceneSurface> InteractionBridge<O, S> {
    pub fn new(objects: O, scene: S) -> Self {
        let config = crate::config::InteractionConfig::default();
        Self::with_config(objects, scene, &config)
    }

    pub fn with_config(objects: O, scene: S, config: &crate::config::InteractionConfig) -> Self {
        Self {
            objects,
            scene,
            input: InputState::new(),
            pointer_drag: None,
            gesture_grab: None,
            pending: Vec::new(),
            rotation_factor: config.grab_rotation_factor,
            wheel_zoom_factor: config.wheel_zoom_factor,
            touch_zoom_factor: config.touch_zoom_factor,
        }
    }

    pub fn objects(&self) -> &O {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut O {
        &mut self.objects
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn hit_test(&self, point: Point) -> Option<ObjectId> {
        self.objects.object_at_position(point)
    }

    /// Grab an object on behalf of a gesture. Refused while a pointer drag
    /// holds an object.
    pub fn grab(&mut self, id: ObjectId, point: Point) -> bool {
        if let Some(held) = self.pointer_grabbed() {
            log::debug!("Grab of {id} refused: pointer holds {held}");
            return false;
        }
        if let Some(previous) = self.gesture_grab.take() {
            self.objects.release_object(previous);
        }
        log::debug!("Grab {id} at ({:.0}, {:.0})", point.x, point.y);
        self.objects.grab_object(id, point);
        self.gesture_grab = Some(id);
        true
    }

    pub fn move_grabbed(&mut self, id: ObjectId, point: Point) {
        self.objects.move_grabbed_object(id, point);
    }

    /// Rotate by a screen-space displacement, scaled to radians.
    pub fn rotate(&mut self, id: ObjectId, displacement: Vec2) {
        self.objects.rotate_object(id, displacement * self.rotation_factor);
    }

    pub fn poke(&mut self, id: ObjectId, point: Point) {
        self.objects.poke_object(id, point);
    }

    pub fn remove(&mut self, id: ObjectId) {
        log::info!("Removing object {id}");
        if self.pointer_grabbed() == Some(id) {
            self.pointer_drag = None;
        }
        if self.gesture_grab == Some(id) {
            self.gesture_grab = None;
        }
        self.objects.remove_object(id);
    }

    /// Release a gesture grab.
    pub fn release(&mut self, id: ObjectId) {
        log::debug!("Release {id}");
        if self.gesture_grab == Some(id) {
            self.gesture_grab = None;
        }
        self.objects.release_object(id);
    }

    /// Hand a closed stroke to the object manager. The result arrives through
    /// [`poll_pending`](Self::poll_pending).
    pub fn solidify(&mut self, stroke: &Stroke) {
        let stroke_id = stroke.id();
        let creation = self.objects.create_from_stroke(stroke);
        self.pending.push(Box::pin(async move {
            match creation.await {
                Ok(object) => TaskOutcome::Solidified { stroke: stroke_id, object },
                Err(error) => TaskOutcome::SolidifyFailed { stroke: stroke_id, error },
            }
        }));
    }

    /// Remove every object. The result arrives through `poll_pending`.
    pub fn clear_objects(&mut self) {
        if let Some(PointerDrag::Rotating(id)) = self.pointer_drag.take() {
            self.objects.release_object(id);
        }
        self.gesture_grab = None;
        let clearing = self.objects.clear_all();
        self.pending.push(Box::pin(async move {
            match clearing.await {
                Ok(()) => TaskOutcome::Cleared,
                Err(error) => TaskOutcome::ClearFailed(error),
            }
        }));
    }

    /// Poll outstanding async operations once, returning those that finished.
    pub fn poll_pending(&mut self) -> Vec<TaskOutcome> {
        let mut cx = Context::from_waker(Waker::noop());
        let mut finished = Vec::new();
        self.pending.retain_mut(|task| match task.as_mut().poll(&mut cx) {
            Poll::Ready(outcome) => {
                finished.push(outcome);
                false
            }
            Poll::Pending => true,
        });
        finished
    }

    /// Number of async operations still in flight.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn update_physics(&mut self, delta_time: f64, elapsed: f64) {
        self.objects.update(delta_time, elapsed);
    }

    pub fn render_scene(&mut self) {
        self.scene.render();
    }

    pub fn resize(&mut self, size: Size) {
        self.scene.resize(size);
    }

    pub fn object_count(&self) -> usize {
        self.objects.object_count()
    }

    /// Object currently held by a pointer drag.
    pub fn pointer_grabbed(&self) -> Option<ObjectId> {
        match self.pointer_drag {
            Some(PointerDrag::Rotating(id)) => Some(id),
            _ => None,
        }
    }

    pub fn pointer_drag(&self) -> Option<PointerDrag> {
        self.pointer_drag
    }

    /// Object currently held by a gesture grab.
    pub fn gesture_grabbed(&self) -> Option<ObjectId> {
        self.gesture_grab
    }

    /// The single grabbed object, whoever holds it.
    pub fn grabbed(&self) -> Option<ObjectId> {
        self.gesture_grab.or_else(|| self.pointer_grabbed())
    }

    /// Route a pointer/touch event to object rotation or camera control.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        let Some(action) = self.input.handle_pointer_event(event) else {
            return;
        };

        match action {
            PointerAction::Press(point) => {
                // A hand-held object keeps its grab; the pointer orbits instead.
                let hit = match self.gesture_grab {
                    Some(_) => None,
                    None => self.scene.raycast_objects(point),
                };
                let drag = match hit {
                    Some(id) => {
                        log::debug!("Pointer grab {id} at ({:.0}, {:.0})", point.x, point.y);
                        self.objects.grab_object(id, point);
                        PointerDrag::Rotating(id)
                    }
                    None => PointerDrag::Orbiting,
                };
                self.pointer_drag = Some(drag);
            }
            PointerAction::Drag { delta, .. } => match self.pointer_drag {
                Some(PointerDrag::Rotating(id)) => self.rotate(id, delta),
                Some(PointerDrag::Orbiting) => self.scene.orbit_camera(delta),
                None => {}
            },
            PointerAction::Release(_) => {
                if let Some(PointerDrag::Rotating(id)) = self.pointer_drag.take() {
                    log::debug!("Pointer release {id}");
                    self.objects.release_object(id);
                }
            }
            PointerAction::WheelZoom(lines) => self.scene.zoom_camera(-lines * self.wheel_zoom_factor),
            PointerAction::PinchZoom(spread) => self.scene.zoom_camera(spread * self.touch_zoom_factor),
        }
    }
}
