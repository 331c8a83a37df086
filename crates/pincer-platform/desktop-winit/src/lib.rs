//! Desktop winit input adapter.
//!
//! Translates winit mouse and touch events into [`RawPointer`]s with logical
//! (scale-factor corrected) coordinates. The mouse is modeled as pointer id
//! zero; touch points keep their winit ids offset past it.

use pincer_core::{Point, PointerPhase, RawPointer};
use winit::dpi::PhysicalPosition;
use winit::event::TouchPhase;

/// Pointer id reserved for the mouse cursor.
pub const MOUSE_POINTER_ID: u64 = 0;

pub struct DesktopWinitPlatform {
    scale_factor: f64,
    cursor: Point,
    mouse_down: bool,
}

impl DesktopWinitPlatform {
    pub fn new(scale_factor: f64) -> Self {
        Self {
            scale_factor,
            cursor: Point::ZERO,
            mouse_down: false,
        }
    }

    pub fn set_scale_factor(&mut self, factor: f64) {
        self.scale_factor = factor;
    }

    /// Physical window coordinates to logical pointer coordinates.
    pub fn pointer_position(&self, position: PhysicalPosition<f64>) -> Point {
        Point {
            x: (position.x / self.scale_factor) as f32,
            y: (position.y / self.scale_factor) as f32,
        }
    }

    /// Translate a `WindowEvent::CursorMoved`. Emits a move only while the
    /// primary button is held; hover produces nothing the gesture layer
    /// cares about.
    pub fn cursor_moved(&mut self, position: PhysicalPosition<f64>) -> Option<RawPointer> {
        self.cursor = self.pointer_position(position);
        self.mouse_down.then(|| RawPointer {
            id: MOUSE_POINTER_ID,
            position: self.cursor,
            phase: PointerPhase::Move,
        })
    }

    /// Translate a primary-button `WindowEvent::MouseInput` at the last seen
    /// cursor position.
    pub fn mouse_input(&mut self, pressed: bool) -> RawPointer {
        self.mouse_down = pressed;
        RawPointer {
            id: MOUSE_POINTER_ID,
            position: self.cursor,
            phase: if pressed {
                PointerPhase::Down
            } else {
                PointerPhase::Up
            },
        }
    }

    /// Translate a `WindowEvent::Touch`.
    pub fn touch(&self, id: u64, phase: TouchPhase, location: PhysicalPosition<f64>) -> RawPointer {
        RawPointer {
            // Touch ids start at 0 on some backends; keep them clear of the
            // mouse id.
            id: id + 1,
            position: self.pointer_position(location),
            phase: match phase {
                TouchPhase::Started => PointerPhase::Down,
                TouchPhase::Moved => PointerPhase::Move,
                TouchPhase::Ended => PointerPhase::Up,
                TouchPhase::Cancelled => PointerPhase::Cancel,
            },
        }
    }
}

impl Default for DesktopWinitPlatform {
    fn default() -> Self {
        Self::new(1.0)
    }
}
