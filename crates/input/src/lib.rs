//! Input: raw device events are mapped by each app onto shared actions.
//!
//! # Invariants
//! - Actions are applied once per tick, before rendering.

pub mod action;

pub use action::{Action, ActionQueue};
