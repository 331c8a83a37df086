//! Drop target registration and hit-testing.

use indexmap::IndexMap;
use pincer_core::{guard_callback, Point, Rect};

pub type DropTargetId = u64;

/// Information handed to a drop target when something lands on it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DropPayload {
    /// Identifier of the dragged element, chosen by its controller's host.
    pub source: u64,
    /// Element center position at release.
    pub position: Point,
}

/// One registered drop zone.
pub struct DropTarget {
    id: DropTargetId,
    rect: Rect,
    snap_on_drop: bool,
    on_drop: Option<Box<dyn FnMut(&DropPayload)>>,
}

impl DropTarget {
    pub fn new(id: DropTargetId, rect: Rect) -> Self {
        Self {
            id,
            rect,
            snap_on_drop: false,
            on_drop: None,
        }
    }

    /// Animate the dragged element onto this target's center on drop.
    pub fn with_snap_on_drop(mut self, snap: bool) -> Self {
        self.snap_on_drop = snap;
        self
    }

    pub fn with_on_drop(mut self, on_drop: impl FnMut(&DropPayload) + 'static) -> Self {
        self.on_drop = Some(Box::new(on_drop));
        self
    }
}

/// Result of a registry hit-test, detached from the registry borrow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DropHit {
    pub id: DropTargetId,
    pub rect: Rect,
    pub snap_on_drop: bool,
}

/// Spatial registry of drop targets.
///
/// Targets are supplied and mutated externally (typically by a layout
/// manager); the gesture engine only reads their current geometry during
/// hit-testing. Mutating the registry while a drag is live is caller
/// responsibility and is not defined behavior.
///
/// Registration order is meaningful: when targets overlap, the most recently
/// registered one wins the hit-test.
#[derive(Default)]
pub struct DropTargetRegistry {
    targets: IndexMap<DropTargetId, DropTarget>,
}

impl DropTargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a target. Re-registering an id replaces the target but keeps
    /// its original position in the overlap order.
    pub fn register(&mut self, target: DropTarget) {
        self.targets.insert(target.id, target);
    }

    pub fn unregister(&mut self, id: DropTargetId) -> bool {
        self.targets.shift_remove(&id).is_some()
    }

    /// Update a target's geometry in place (layout moved it).
    pub fn update_rect(&mut self, id: DropTargetId, rect: Rect) -> bool {
        match self.targets.get_mut(&id) {
            Some(target) => {
                target.rect = rect;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }

    /// Hit-test a point (the dragged element's center) against all targets.
    /// The last registered containing target wins.
    pub fn hit_test(&self, point: Point) -> Option<DropHit> {
        let mut hit = None;
        for target in self.targets.values() {
            if target.rect.contains(point) {
                hit = Some(DropHit {
                    id: target.id,
                    rect: target.rect,
                    snap_on_drop: target.snap_on_drop,
                });
            }
        }
        hit
    }

    /// Invoke a target's drop handler, containing any panic it raises.
    pub fn notify_drop(&mut self, id: DropTargetId, payload: &DropPayload) {
        if let Some(target) = self.targets.get_mut(&id) {
            if let Some(on_drop) = target.on_drop.as_mut() {
                guard_callback("on_drop", || on_drop(payload));
            }
        } else {
            log::debug!("drop on unknown target {id} ignored");
        }
    }
}
