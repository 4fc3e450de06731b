//! In-memory object manager and scene.
//!
//! Objects are extruded stroke footprints kept in screen space. Physics is a
//! damped wobble excited by pokes; the camera is an orbit with a clamped
//! distance. Both halves share one world so raycasts see the same objects the
//! object manager created.

use airform_core::bridge::{BoxFuture, ObjectError, ObjectId, ObjectManager, ObjectResult, SceneSurface};
use airform_core::color::SerializableColor;
use airform_core::stroke::Stroke;
use kurbo::{BezPath, Point, Rect, Shape, Size, Vec2};
use std::cell::RefCell;
use std::f64::consts::FRAC_PI_2;
use std::rc::Rc;
use uuid::Uuid;

/// Footprints with less area than this cannot be extruded.
pub const MIN_FOOTPRINT_AREA: f64 = 1.0;
/// Wobble decay rate per second.
const WOBBLE_DAMPING: f64 = 4.0;
/// Wobble oscillation frequency in Hz.
const WOBBLE_FREQUENCY: f64 = 3.0;
/// Orbit radians per pixel of drag.
const ORBIT_SPEED: f64 = 0.005;
const MIN_DISTANCE: f64 = 2.0;
const MAX_DISTANCE: f64 = 50.0;

/// One solidified shape.
#[derive(Debug, Clone)]
pub struct SimObject {
    pub id: ObjectId,
    /// Closed outline in screen space, relative to `position`.
    pub outline: BezPath,
    pub color: SerializableColor,
    /// Screen-space translation applied to the outline.
    pub position: Vec2,
    /// Accumulated rotation (yaw, pitch) in radians.
    pub rotation: Vec2,
    /// Current wobble amplitude, decays to zero.
    pub wobble: f64,
    /// Wobble displacement at the last physics step.
    pub wobble_offset: f64,
}

impl SimObject {
    fn contains(&self, point: Point) -> bool {
        self.outline.contains(point - self.position)
    }

    /// Screen-space bounds of the outline.
    pub fn bounds(&self) -> Rect {
        self.outline.bounding_box() + self.position
    }
}

/// Orbit camera state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub yaw: f64,
    pub pitch: f64,
    pub distance: f64,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self { yaw: 0.0, pitch: 0.0, distance: 10.0 }
    }
}

/// Shared simulation state.
#[derive(Debug, Default)]
pub struct World {
    pub objects: Vec<SimObject>,
    pub camera: OrbitCamera,
    pub viewport: Size,
    /// Object held by a grab, with the grab point's offset from its position.
    grabbed: Option<(ObjectId, Vec2)>,
    pub frames_rendered: u64,
    pub elapsed: f64,
}

impl World {
    /// Topmost object containing a screen point.
    pub fn hit_test(&self, point: Point) -> Option<ObjectId> {
        self.objects.iter().rev().find(|o| o.contains(point)).map(|o| o.id)
    }

    pub fn object(&self, id: ObjectId) -> Option<&SimObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    fn object_mut(&mut self, id: ObjectId) -> Option<&mut SimObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn grabbed(&self) -> Option<ObjectId> {
        self.grabbed.map(|(id, _)| id)
    }
}

/// Create an object manager and scene over one shared world.
pub fn simulated_world() -> (SimulatedObjects, SimulatedScene, Rc<RefCell<World>>) {
    let world = Rc::new(RefCell::new(World::default()));
    (
        SimulatedObjects { world: Rc::clone(&world) },
        SimulatedScene { world: Rc::clone(&world) },
        world,
    )
}

/// [`ObjectManager`] over the simulated world.
#[derive(Debug, Clone)]
pub struct SimulatedObjects {
    world: Rc<RefCell<World>>,
}

impl ObjectManager for SimulatedObjects {
    fn object_at_position(&self, point: Point) -> Option<ObjectId> {
        self.world.borrow().hit_test(point)
    }

    fn create_from_stroke(&mut self, stroke: &Stroke) -> BoxFuture<'static, ObjectResult<ObjectId>> {
        let area = stroke.area();
        if area < MIN_FOOTPRINT_AREA {
            let error = ObjectError::Degenerate(format!("footprint area {area:.2} is too small to extrude"));
            return Box::pin(std::future::ready(Err(error)));
        }

        let mut outline = BezPath::new();
        let mut points = stroke.points.iter();
        if let Some(first) = points.next() {
            outline.move_to(*first);
            for p in points {
                outline.line_to(*p);
            }
            outline.close_path();
        }

        let id = Uuid::new_v4();
        self.world.borrow_mut().objects.push(SimObject {
            id,
            outline,
            color: stroke.color,
            position: Vec2::ZERO,
            rotation: Vec2::ZERO,
            wobble: 0.0,
            wobble_offset: 0.0,
        });
        log::debug!("Extruded object {id} from stroke {} (area {area:.0})", stroke.id());
        Box::pin(std::future::ready(Ok(id)))
    }

    fn poke_object(&mut self, id: ObjectId, _point: Point) {
        if let Some(object) = self.world.borrow_mut().object_mut(id) {
            object.wobble = 1.0;
        }
    }

    fn grab_object(&mut self, id: ObjectId, point: Point) {
        let mut world = self.world.borrow_mut();
        let Some(position) = world.object(id).map(|o| o.position) else {
            log::warn!("Grab of unknown object {id}");
            return;
        };
        world.grabbed = Some((id, point.to_vec2() - position));
    }

    fn release_object(&mut self, id: ObjectId) {
        let mut world = self.world.borrow_mut();
        if world.grabbed() == Some(id) {
            world.grabbed = None;
        }
    }

    fn move_grabbed_object(&mut self, id: ObjectId, point: Point) {
        let mut world = self.world.borrow_mut();
        let Some((grabbed, offset)) = world.grabbed else {
            return;
        };
        if grabbed != id {
            return;
        }
        if let Some(object) = world.object_mut(id) {
            object.position = point.to_vec2() - offset;
        }
    }

    fn rotate_object(&mut self, id: ObjectId, delta: Vec2) {
        if let Some(object) = self.world.borrow_mut().object_mut(id) {
            object.rotation += delta;
        }
    }

    fn remove_object(&mut self, id: ObjectId) {
        let mut world = self.world.borrow_mut();
        world.objects.retain(|o| o.id != id);
        if world.grabbed() == Some(id) {
            world.grabbed = None;
        }
    }

    fn clear_all(&mut self) -> BoxFuture<'static, ObjectResult<()>> {
        let mut world = self.world.borrow_mut();
        world.objects.clear();
        world.grabbed = None;
        Box::pin(std::future::ready(Ok(())))
    }

    fn update(&mut self, delta_time: f64, elapsed: f64) {
        let mut world = self.world.borrow_mut();
        world.elapsed = elapsed;
        let decay = (-WOBBLE_DAMPING * delta_time.max(0.0)).exp();
        for object in &mut world.objects {
            object.wobble *= decay;
            if object.wobble < 1e-3 {
                object.wobble = 0.0;
            }
            object.wobble_offset = object.wobble * (elapsed * WOBBLE_FREQUENCY * std::f64::consts::TAU).sin();
        }
    }

    fn object_count(&self) -> usize {
        self.world.borrow().objects.len()
    }
}

/// [`SceneSurface`] over the simulated world.
#[derive(Debug, Clone)]
pub struct SimulatedScene {
    world: Rc<RefCell<World>>,
}

impl SceneSurface for SimulatedScene {
    fn orbit_camera(&mut self, delta: Vec2) {
        let mut world = self.world.borrow_mut();
        let camera = &mut world.camera;
        camera.yaw += delta.x * ORBIT_SPEED;
        camera.pitch = (camera.pitch + delta.y * ORBIT_SPEED).clamp(-FRAC_PI_2 + 0.01, FRAC_PI_2 - 0.01);
    }

    fn zoom_camera(&mut self, delta: f64) {
        let mut world = self.world.borrow_mut();
        let camera = &mut world.camera;
        camera.distance = (camera.distance - delta).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    fn raycast_objects(&self, point: Point) -> Option<ObjectId> {
        self.world.borrow().hit_test(point)
    }

    fn resize(&mut self, size: Size) {
        self.world.borrow_mut().viewport = size;
    }

    fn render(&mut self) {
        self.world.borrow_mut().frames_rendered += 1;
    }
}
