//! Pointer and touch input, normalized into press/drag/release/zoom actions.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Touch lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchPhase {
    Started,
    Moved,
    Ended,
    Cancelled,
}

/// Raw pointer event from the host (mouse, wheel or touch).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    Scroll {
        position: Point,
        delta: Vec2,
    },
    Touch {
        id: u64,
        phase: TouchPhase,
        position: Point,
    },
}

/// Device-independent pointer action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    /// Primary press (left button or first finger).
    Press(Point),
    /// Primary drag since the previous event.
    Drag { position: Point, delta: Vec2 },
    /// Primary press ended.
    Release(Point),
    /// Wheel scroll, in lines (positive = towards the user).
    WheelZoom(f64),
    /// Change in two-finger spread, in pixels (positive = fingers apart).
    PinchZoom(f64),
}

/// Tracks pointer and touch state across events.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Current pointer position in screen coordinates.
    pub pointer_position: Point,
    /// Previous pointer position for delta calculations.
    pub previous_pointer_position: Point,
    /// Currently pressed mouse buttons.
    pressed_buttons: HashSet<MouseButton>,
    /// Whether the primary pointer is dragging.
    pub is_dragging: bool,
    /// Start position of the current drag.
    pub drag_start: Option<Point>,
    /// Active touches by id.
    touches: BTreeMap<u64, Point>,
    /// Distance between the two touches at the last event.
    touch_spread: Option<f64>,
}

impl InputState {
    /// Create a new input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a raw event, returning the action it implies.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> Option<PointerAction> {
        match event {
            PointerEvent::Down { position, button } => {
                self.move_to(position);
                self.pressed_buttons.insert(button);
                if button == MouseButton::Left && !self.is_dragging {
                    self.is_dragging = true;
                    self.drag_start = Some(position);
                    return Some(PointerAction::Press(position));
                }
                None
            }
            PointerEvent::Up { position, button } => {
                self.move_to(position);
                self.pressed_buttons.remove(&button);
                if button == MouseButton::Left && self.is_dragging {
                    self.is_dragging = false;
                    self.drag_start = None;
                    return Some(PointerAction::Release(position));
                }
                None
            }
            PointerEvent::Move { position } => {
                self.move_to(position);
                if self.is_dragging {
                    return Some(PointerAction::Drag { position, delta: self.pointer_delta() });
                }
                None
            }
            PointerEvent::Scroll { position, delta } => {
                self.move_to(position);
                Some(PointerAction::WheelZoom(delta.y))
            }
            PointerEvent::Touch { id, phase, position } => self.handle_touch(id, phase, position),
        }
    }

    fn handle_touch(&mut self, id: u64, phase: TouchPhase, position: Point) -> Option<PointerAction> {
        match phase {
            TouchPhase::Started => {
                self.touches.insert(id, position);
                match self.touches.len() {
                    1 => {
                        self.move_to(position);
                        self.is_dragging = true;
                        self.drag_start = Some(position);
                        Some(PointerAction::Press(position))
                    }
                    2 => {
                        // Second finger turns the drag into a pinch.
                        self.touch_spread = self.spread();
                        if self.is_dragging {
                            self.is_dragging = false;
                            self.drag_start = None;
                            return Some(PointerAction::Release(self.pointer_position));
                        }
                        None
                    }
                    _ => None,
                }
            }
            TouchPhase::Moved => {
                self.touches.insert(id, position);
                match self.touches.len() {
                    1 if self.is_dragging => {
                        self.move_to(position);
                        Some(PointerAction::Drag { position, delta: self.pointer_delta() })
                    }
                    2 => {
                        let spread = self.spread()?;
                        let previous = self.touch_spread.replace(spread)?;
                        Some(PointerAction::PinchZoom(spread - previous))
                    }
                    _ => None,
                }
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.touches.remove(&id);
                if self.touches.len() < 2 {
                    self.touch_spread = None;
                }
                if self.touches.is_empty() && self.is_dragging {
                    self.move_to(position);
                    self.is_dragging = false;
                    self.drag_start = None;
                    return Some(PointerAction::Release(position));
                }
                None
            }
        }
    }

    fn move_to(&mut self, position: Point) {
        self.previous_pointer_position = self.pointer_position;
        self.pointer_position = position;
    }

    fn spread(&self) -> Option<f64> {
        let mut iter = self.touches.values();
        let a = iter.next()?;
        let b = iter.next()?;
        Some(a.distance(*b))
    }

    /// Check if a button is currently pressed.
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    /// Number of active touches.
    pub fn touch_count(&self) -> usize {
        self.touches.len()
    }

    /// Pointer movement since the previous event.
    pub fn pointer_delta(&self) -> Vec2 {
        self.pointer_position - self.previous_pointer_position
    }

    /// Drag delta from the start position, if dragging.
    pub fn drag_delta(&self) -> Option<Vec2> {
        self.drag_start.map(|start| self.pointer_position - start)
    }
}
