//! Settle animation system for Pincer.
//!
//! Provides tween and spring-physics interpolation of a [`pincer_core::Transform`]
//! toward a target, driven cooperatively one frame at a time by the host.

mod animator;
mod spec;

pub use animator::*;
pub use spec::*;
