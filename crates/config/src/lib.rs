//! Configuration for the orrery apps.
//!
//! Settings live in a YAML file. Every section has defaults matching the
//! Earth/Moon demo, so a partial file (or none) is valid.

mod config;
mod error;

pub use config::{
    BodyConfig, CameraConfig, Config, LightingConfig, OrbitConfig, RenderConfig, WindowConfig,
};
pub use error::ConfigError;
