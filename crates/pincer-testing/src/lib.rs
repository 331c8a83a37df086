//! Robot testing framework for Pincer gesture controllers.
//!
//! Drives controllers with scripted pointer sequences and a fixed frame
//! cadence, entirely headless and deterministic: the robot owns the clock.

mod counters;
mod robot;

pub use counters::*;
pub use robot::*;
