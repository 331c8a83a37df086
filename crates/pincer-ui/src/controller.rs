//! Shared controller plumbing: the driving interface, output ports, and
//! haptic pulses.

use std::rc::Rc;

use pincer_core::{Haptics, NoopHaptics, Point, Renderer, Transform};

/// Uniform driving surface over the four controllers, used by adapters and
/// the test robot to feed pointer events and frames without knowing which
/// interaction they are driving.
pub trait GestureTarget {
    fn pointer_down(&mut self, id: u64, position: Point, timestamp_ms: u64);
    fn pointer_move(&mut self, id: u64, position: Point, timestamp_ms: u64);
    fn pointer_up(&mut self, id: u64, position: Point, timestamp_ms: u64);
    fn pointer_cancel(&mut self, id: u64, position: Point, timestamp_ms: u64);
    fn frame(&mut self, now_ms: u64);
    fn current_transform(&self) -> Transform;
}

/// Haptic pulse length for gesture milestones (drop-target entry, action
/// trigger), in milliseconds.
pub const MILESTONE_PULSE_MS: u32 = 10;

/// Output ports shared by every controller: the renderer the transform is
/// pushed into each frame, and the fire-and-forget haptic port.
pub struct ControllerPorts {
    renderer: Option<Box<dyn Renderer>>,
    haptics: Rc<dyn Haptics>,
}

impl Default for ControllerPorts {
    fn default() -> Self {
        Self {
            renderer: None,
            haptics: Rc::new(NoopHaptics),
        }
    }
}

impl ControllerPorts {
    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn with_haptics(mut self, haptics: Rc<dyn Haptics>) -> Self {
        self.haptics = haptics;
        self
    }

    /// Push the transform into the renderer, if one is attached.
    pub(crate) fn apply(&mut self, transform: &Transform) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.apply(transform);
        }
    }

    /// Request a short milestone vibration.
    pub(crate) fn pulse(&self) {
        self.haptics.vibrate(MILESTONE_PULSE_MS);
    }
}
