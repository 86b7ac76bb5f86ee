//! Shared value types for the orrery workspace.

mod types;

pub use types::{CelestialBody, OrbitRelation};
