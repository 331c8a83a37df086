//! Gesture controllers for Pincer.
//!
//! Each controller composes the foundation primitives (sample stream,
//! classifier, boundary/snap/drop policies) and the settle animator into one
//! interaction: [`Draggable`], [`PinchZoom`], [`SwipeAction`],
//! [`PullToRefresh`].
//!
//! Controllers are single-threaded and event-driven: all state mutation
//! happens synchronously inside `on_pointer_*` handlers and the host-driven
//! `on_frame` tick. No controller shares its transform with another.

mod controller;
mod draggable;
mod pinch_zoom;
mod pull_to_refresh;
mod swipe_action;

pub use controller::*;
pub use draggable::*;
pub use pinch_zoom::*;
pub use pull_to_refresh::*;
pub use swipe_action::*;
