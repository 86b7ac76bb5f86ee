use glam::{Mat4, Vec3};
use orrery_config::CameraConfig;
use orrery_kernel::OrbitSystem;

use crate::style::SceneStyle;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl RenderView {
    /// Starting view: `distance` units along +Z, looking at the origin.
    pub fn from_config(camera: &CameraConfig) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, camera.distance),
            target: Vec3::ZERO,
            fov_degrees: camera.fov_degrees,
            near: camera.near,
            far: camera.far,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), aspect, self.near, self.far)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the orbit system and a view, then produces output. It
/// never mutates the system.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given orbit state and view.
    fn render(&self, system: &OrbitSystem, view: &RenderView) -> Self::Output;
}

/// Text renderer for headless runs.
///
/// Produces a human-readable dump of the orbit state. Used by the CLI and
/// for testing the render interface.
#[derive(Debug, Clone)]
pub struct DebugTextRenderer {
    primary_name: String,
    satellite_name: String,
}

impl Default for DebugTextRenderer {
    fn default() -> Self {
        Self {
            primary_name: "primary".into(),
            satellite_name: "satellite".into(),
        }
    }
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Label bodies with the names from a scene style.
    pub fn with_style(style: &SceneStyle) -> Self {
        Self {
            primary_name: style.primary.name.clone(),
            satellite_name: style.satellite.name.clone(),
        }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, system: &OrbitSystem, view: &RenderView) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Orbit (tick={}, radius={:.2}) ===\n",
            system.tick(),
            system.relation().radius
        ));
        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}\n",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees
        ));

        for (name, body) in [
            (&self.primary_name, system.primary()),
            (&self.satellite_name, system.satellite()),
        ] {
            let p = body.position;
            out.push_str(&format!(
                "  {name:<10} rot={:.4} pos=({:.3}, {:.3}, {:.3})\n",
                body.rotation_y, p.x, p.y, p.z
            ));
        }

        out
    }
}
