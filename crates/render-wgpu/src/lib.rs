//! wgpu render backend for the orrery.
//!
//! Draws the primary and satellite as lit, instanced UV spheres under one
//! point light plus ambient. The camera orbits a target with drag/wheel
//! controls.
//!
//! # Invariants
//! - Renderer never mutates the orbit system.
//! - Camera motion is not part of the simulation.

mod camera;
mod gpu;
mod mesh;
mod shaders;

pub use camera::OrbitCamera;
pub use gpu::{WgpuFrame, WgpuRenderer};
