//! Shared counters and recording ports for controller tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pincer_core::{Haptics, Renderer, Transform};

/// Cloneable invocation counter for callback hooks.
#[derive(Clone, Default)]
pub struct Counter {
    count: Rc<Cell<usize>>,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self) {
        self.count.set(self.count.get() + 1);
    }

    pub fn count(&self) -> usize {
        self.count.get()
    }

    /// A closure that bumps this counter, for wiring into `on_*` hooks.
    pub fn hook(&self) -> impl FnMut() + 'static {
        let counter = self.clone();
        move || counter.increment()
    }
}

/// Haptic port that counts pulses instead of vibrating.
#[derive(Clone, Default)]
pub struct CountingHaptics {
    pulses: Counter,
}

impl CountingHaptics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pulses(&self) -> usize {
        self.pulses.count()
    }
}

impl Haptics for CountingHaptics {
    fn vibrate(&self, _duration_ms: u32) {
        self.pulses.increment();
    }
}

/// Renderer that records every applied transform.
#[derive(Clone, Default)]
pub struct RecordingRenderer {
    applied: Rc<RefCell<Vec<Transform>>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn applied(&self) -> Vec<Transform> {
        self.applied.borrow().clone()
    }

    pub fn last(&self) -> Option<Transform> {
        self.applied.borrow().last().copied()
    }
}

impl Renderer for RecordingRenderer {
    fn apply(&mut self, transform: &Transform) {
        self.applied.borrow_mut().push(*transform);
    }
}
