//! Orbit kernel: the per-tick animation step and the state it mutates.
//!
//! # Invariants
//! - One `advance` per tick; the step is independent of wall-clock time.
//! - Satellite placement is recomputed from the primary's angle every tick,
//!   never accumulated.

pub mod animator;
pub mod system;

pub use animator::OrbitAnimator;
pub use system::OrbitSystem;
