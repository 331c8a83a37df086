//! Foundation layer of the Pincer gesture engine.
//!
//! Turns normalized pointer samples into classified gesture sessions and
//! provides the spatial policies (boundaries, snap points, drop targets) the
//! controllers resolve against.

mod bounds;
mod classifier;
mod drop_targets;
pub mod gesture_constants;
mod session;
mod snap;
mod stream;
mod velocity_tracker;

pub use bounds::*;
pub use classifier::*;
pub use drop_targets::*;
pub use session::*;
pub use snap::*;
pub use stream::*;
pub use velocity_tracker::*;
