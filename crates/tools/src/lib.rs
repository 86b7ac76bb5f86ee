//! Developer Tooling: read-only inspection of the orbit system.

mod inspector;

pub use inspector::{BodyInfo, OrbitInspector, OrbitSummary};

pub fn crate_info() -> &'static str {
    "orrery-tools v0.1.0"
}
