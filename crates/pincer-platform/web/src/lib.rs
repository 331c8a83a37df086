//! Web input adapter.
//!
//! Translates browser pointer and touch events into [`RawPointer`]s. The
//! browser reports `offset_x`/`offset_y` and touch client coordinates in CSS
//! pixels (logical coordinates already), so no scale-factor division is
//! needed.

use pincer_core::{Point, PointerPhase, RawPointer};

pub struct WebPlatform {
    scale_factor: f64,
}

impl WebPlatform {
    pub fn new(scale_factor: f64) -> Self {
        Self { scale_factor }
    }

    pub fn set_scale_factor(&mut self, factor: f64) {
        self.scale_factor = factor;
    }

    pub fn pointer_position(&self, x: f64, y: f64) -> Point {
        // CSS pixels are logical coordinates; the scale factor is kept only
        // for parity with the desktop adapter's API.
        Point {
            x: x as f32,
            y: y as f32,
        }
    }

    /// Translate a `pointerdown`/`pointermove`/`pointerup`/`pointercancel`
    /// event.
    pub fn pointer_event(&self, event: &web_sys::PointerEvent, phase: PointerPhase) -> RawPointer {
        RawPointer {
            id: event.pointer_id() as u64,
            position: self.pointer_position(event.offset_x() as f64, event.offset_y() as f64),
            phase,
        }
    }

    /// Translate a touch event's changed touches, one raw pointer per
    /// finger, so multi-touch pinches reach the gesture layer. `origin` is
    /// the listening element's client position (touches only carry client
    /// coordinates).
    pub fn touch_event(
        &self,
        event: &web_sys::TouchEvent,
        phase: PointerPhase,
        origin: Point,
    ) -> Vec<RawPointer> {
        let changed = event.changed_touches();
        let mut raw = Vec::with_capacity(changed.length() as usize);
        for index in 0..changed.length() {
            let Some(touch) = changed.get(index) else {
                continue;
            };
            let position = self.pointer_position(
                touch.client_x() as f64 - origin.x as f64,
                touch.client_y() as f64 - origin.y as f64,
            );
            raw.push(RawPointer {
                id: touch.identifier() as u64,
                position,
                phase,
            });
        }
        raw
    }
}

impl Default for WebPlatform {
    fn default() -> Self {
        Self::new(1.0)
    }
}
