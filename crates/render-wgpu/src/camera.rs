use glam::{Vec2, Vec3};
use orrery_config::CameraConfig;
use orrery_input::Action;
use orrery_render::RenderView;
use std::f32::consts::FRAC_PI_2;

/// Keeps the camera from flipping over the poles.
const MAX_PITCH: f32 = FRAC_PI_2 - 0.01;

/// Orbit camera: circles a target at a distance, driven by drag and wheel.
///
/// Movement is applied immediately; there is no damping.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    /// Azimuth about +Y. Zero looks down -Z from +Z.
    pub yaw: f32,
    /// Elevation above the XZ plane.
    pub pitch: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub sensitivity: f32,
    pub zoom_step: f32,
    viewport_height: f32,
    home: (Vec3, f32, f32, f32),
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl OrbitCamera {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            target: Vec3::ZERO,
            distance: config.distance,
            yaw: 0.0,
            pitch: 0.0,
            fov_degrees: config.fov_degrees,
            near: config.near,
            far: config.far,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            sensitivity: config.rotate_sensitivity,
            zoom_step: config.zoom_step,
            viewport_height: 720.0,
            home: (Vec3::ZERO, config.distance, 0.0, 0.0),
        }
    }

    /// Pan speed depends on the viewport height in pixels.
    pub fn set_viewport_height(&mut self, height: u32) {
        self.viewport_height = height.max(1) as f32;
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target + self.distance * Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw)
    }

    /// Drag right spins the scene right; drag up tilts it toward the viewer.
    pub fn rotate(&mut self, delta: Vec2) {
        self.yaw -= delta.x * self.sensitivity;
        self.pitch = (self.pitch + delta.y * self.sensitivity).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Move the target in the view plane so the point under the cursor
    /// follows the drag.
    pub fn pan(&mut self, delta: Vec2) {
        let forward = (self.target - self.eye()).normalize();
        let right = forward.cross(Vec3::Y).normalize();
        let up = right.cross(forward);
        let world_per_pixel =
            2.0 * self.distance * (self.fov_degrees.to_radians() / 2.0).tan() / self.viewport_height;
        self.target += (-delta.x * right + delta.y * up) * world_per_pixel;
    }

    /// Positive notches move closer.
    pub fn zoom(&mut self, notches: f32) {
        let factor = (1.0 - self.zoom_step).powf(notches);
        self.distance = (self.distance * factor).clamp(self.min_distance, self.max_distance);
    }

    pub fn reset(&mut self) {
        (self.target, self.distance, self.yaw, self.pitch) = self.home;
    }

    /// Apply a camera action. Non-camera actions return `false`.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::OrbitCamera(d) => self.rotate(d),
            Action::Pan(d) => self.pan(d),
            Action::Zoom(n) => self.zoom(n),
            Action::ResetCamera => self.reset(),
            _ => return false,
        }
        true
    }

    pub fn view(&self) -> RenderView {
        RenderView {
            eye: self.eye(),
            target: self.target,
            fov_degrees: self.fov_degrees,
            near: self.near,
            far: self.far,
        }
    }
}
