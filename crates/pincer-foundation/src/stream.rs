//! Pointer sample normalization.
//!
//! Platform adapters feed raw down/move/up/cancel observations here; the
//! stream tracks the active pointer set and emits [`PointerSample`]s with a
//! consistent active-pointer count on every backend.

use pincer_core::{Point, PointerId, PointerPhase, PointerSample};
use smallvec::SmallVec;
use web_time::Instant;

/// Normalizes raw input events into timestamped pointer samples.
///
/// Samples are emitted strictly in arrival order. Move/Up observations for a
/// pointer that never went down are malformed; the caller sees `None` and the
/// event is logged at debug level.
pub struct PointerSampleStream {
    /// Active pointers in press order. Two entries is the common pinch case.
    pointers: SmallVec<[(PointerId, Point); 4]>,
    epoch: Instant,
}

impl Default for PointerSampleStream {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerSampleStream {
    pub fn new() -> Self {
        Self {
            pointers: SmallVec::new(),
            epoch: Instant::now(),
        }
    }

    /// Milliseconds since the stream was created. Adapters that have no host
    /// timestamp use this clock.
    pub fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    pub fn active_count(&self) -> usize {
        self.pointers.len()
    }

    /// Latest positions of all active pointers, in press order.
    pub fn positions(&self) -> &[(PointerId, Point)] {
        &self.pointers
    }

    /// The first two active pointers, when a two-finger gesture is possible.
    pub fn touch_pair(&self) -> Option<(Point, Point)> {
        if self.pointers.len() >= 2 {
            Some((self.pointers[0].1, self.pointers[1].1))
        } else {
            None
        }
    }

    pub fn on_down(&mut self, id: PointerId, position: Point, timestamp_ms: u64) -> PointerSample {
        match self.pointers.iter_mut().find(|(pid, _)| *pid == id) {
            Some(entry) => {
                // Repeated Down without an Up in between; treat as a move of
                // the existing pointer rather than a second press.
                log::debug!("pointer {id} pressed while already down");
                entry.1 = position;
            }
            None => self.pointers.push((id, position)),
        }
        PointerSample::new(
            id,
            position,
            timestamp_ms,
            self.pointers.len(),
            PointerPhase::Down,
        )
    }

    pub fn on_move(
        &mut self,
        id: PointerId,
        position: Point,
        timestamp_ms: u64,
    ) -> Option<PointerSample> {
        let entry = match self.pointers.iter_mut().find(|(pid, _)| *pid == id) {
            Some(entry) => entry,
            None => {
                log::debug!("move for unknown pointer {id} dropped");
                return None;
            }
        };
        entry.1 = position;
        Some(PointerSample::new(
            id,
            position,
            timestamp_ms,
            self.pointers.len(),
            PointerPhase::Move,
        ))
    }

    pub fn on_up(
        &mut self,
        id: PointerId,
        position: Point,
        timestamp_ms: u64,
    ) -> Option<PointerSample> {
        self.release(id, position, timestamp_ms, PointerPhase::Up)
    }

    pub fn on_cancel(
        &mut self,
        id: PointerId,
        position: Point,
        timestamp_ms: u64,
    ) -> Option<PointerSample> {
        self.release(id, position, timestamp_ms, PointerPhase::Cancel)
    }

    fn release(
        &mut self,
        id: PointerId,
        position: Point,
        timestamp_ms: u64,
        phase: PointerPhase,
    ) -> Option<PointerSample> {
        let index = match self.pointers.iter().position(|(pid, _)| *pid == id) {
            Some(index) => index,
            None => {
                log::debug!("release for unknown pointer {id} dropped");
                return None;
            }
        };
        self.pointers.remove(index);
        // Up/Cancel report the count *after* this pointer lifted.
        Some(PointerSample::new(
            id,
            position,
            timestamp_ms,
            self.pointers.len(),
            phase,
        ))
    }
}
