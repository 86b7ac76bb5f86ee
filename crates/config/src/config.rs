//! Configuration structs, YAML persistence and validation.

use std::path::Path;

use glam::DVec3;
use orrery_common::{CelestialBody, OrbitRelation};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    /// The orbited body (Earth).
    pub primary: BodyConfig,
    /// The orbiting body (Moon).
    pub satellite: BodyConfig,
    pub orbit: OrbitConfig,
    pub lighting: LightingConfig,
    pub camera: CameraConfig,
    pub render: RenderConfig,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_level: String,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    /// Present with vsync (`AutoVsync`); otherwise `AutoNoVsync`.
    pub vsync: bool,
}

/// One celestial body. Speed and scale have no sensible shared default, so
/// they must be given whenever the section is present. Bodies carry no
/// position: the primary sits at `orbit.center` and the satellite is placed
/// on its orbit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BodyConfig {
    #[serde(default = "default_body_name")]
    pub name: String,
    /// Radians per tick.
    pub rotation_speed: f64,
    /// Uniform scale applied to the unit sphere.
    pub scale: f32,
    /// Linear RGB albedo.
    #[serde(default = "default_body_color")]
    pub color: [f32; 3],
}

/// Orbit configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OrbitConfig {
    /// Distance kept between primary and satellite centers.
    pub radius: f64,
    /// Position of the primary.
    pub center: [f64; 3],
}

/// Sun (point light) and ambient light.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightingConfig {
    pub sun_position: [f32; 3],
    pub sun_color: [f32; 3],
    /// Point light intensity; falls off with the inverse square of distance.
    pub sun_intensity: f32,
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
}

/// Perspective camera and orbit-control settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Starting distance from the target along +Z.
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Radians of orbit per pixel of drag.
    pub rotate_sensitivity: f32,
    /// Fraction of the current distance moved per wheel notch.
    pub zoom_step: f32,
}

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// MSAA sample count (1 or 4).
    pub msaa_samples: u32,
    /// Width and height segments of the UV sphere.
    pub sphere_segments: u32,
    pub clear_color: [f32; 3],
}

fn default_body_name() -> String {
    "body".into()
}

fn default_body_color() -> [f32; 3] {
    [0.8, 0.8, 0.8]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            primary: BodyConfig {
                name: "Earth".into(),
                rotation_speed: 0.009,
                scale: 5.0,
                color: [0.18, 0.36, 0.75],
            },
            satellite: BodyConfig {
                name: "Moon".into(),
                rotation_speed: 0.05,
                scale: 1.5,
                color: [0.62, 0.62, 0.6],
            },
            orbit: OrbitConfig::default(),
            lighting: LightingConfig::default(),
            camera: CameraConfig::default(),
            render: RenderConfig::default(),
            log_level: "info,wgpu_core=warn,wgpu_hal=warn,naga=warn".into(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Earth & Moon".into(),
            vsync: true,
        }
    }
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            radius: 10.0,
            center: [0.0; 3],
        }
    }
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            sun_position: [15.0, 5.0, 0.0],
            sun_color: [1.0, 1.0, 1.0],
            sun_intensity: 100.0,
            ambient_color: [1.0, 1.0, 1.0],
            ambient_intensity: 0.2,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 60.0,
            near: 0.1,
            far: 200.0,
            distance: 40.0,
            min_distance: 1.0,
            max_distance: 190.0,
            rotate_sensitivity: 0.005,
            zoom_step: 0.1,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            msaa_samples: 4,
            sphere_segments: 32,
            clear_color: [0.0, 0.0, 0.02],
        }
    }
}

impl Config {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(ConfigError::Serialize)
    }

    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_yaml_str(&text)?;
        tracing::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given, otherwise fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Write the config as YAML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source: std::io::Error| ConfigError::Write {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let text = self.to_yaml()?;
        std::fs::write(path, text).map_err(write_err)
    }

    pub fn orbit_relation(&self) -> OrbitRelation {
        OrbitRelation::new(self.orbit.radius)
    }

    /// The primary, unrotated, at `orbit.center`.
    pub fn primary_body(&self) -> CelestialBody {
        CelestialBody::new(
            DVec3::from_array(self.orbit.center),
            self.primary.rotation_speed,
        )
    }

    /// The satellite, unrotated. Its position is set when the system places
    /// it on the orbit.
    pub fn satellite_body(&self) -> CelestialBody {
        CelestialBody::new(DVec3::ZERO, self.satellite.rotation_speed)
    }

    /// Reject values the animator and renderer assume never occur.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, body) in [
            ("primary.rotation_speed", &self.primary),
            ("satellite.rotation_speed", &self.satellite),
        ] {
            non_negative(field, body.rotation_speed)?;
        }
        for (field, body) in [
            ("primary.scale", &self.primary),
            ("satellite.scale", &self.satellite),
        ] {
            positive(field, body.scale as f64)?;
        }
        for (field, body) in [
            ("primary.color", &self.primary),
            ("satellite.color", &self.satellite),
        ] {
            color(field, body.color)?;
        }
        non_negative("orbit.radius", self.orbit.radius)?;
        finite("orbit.center", self.orbit.center)?;

        if self.window.width == 0 || self.window.height == 0 {
            return Err(invalid("window", "width and height must be non-zero"));
        }

        let light = &self.lighting;
        finite("lighting.sun_position", light.sun_position.map(f64::from))?;
        color("lighting.sun_color", light.sun_color)?;
        non_negative("lighting.sun_intensity", light.sun_intensity as f64)?;
        color("lighting.ambient_color", light.ambient_color)?;
        non_negative("lighting.ambient_intensity", light.ambient_intensity as f64)?;

        let cam = &self.camera;
        if !(cam.fov_degrees > 0.0 && cam.fov_degrees < 180.0) {
            return Err(invalid("camera.fov_degrees", "must be within (0, 180)"));
        }
        positive("camera.near", cam.near as f64)?;
        if !cam.far.is_finite() || cam.far <= cam.near {
            return Err(invalid("camera.far", "must be greater than camera.near"));
        }
        positive("camera.min_distance", cam.min_distance as f64)?;
        if !(cam.min_distance <= cam.distance && cam.distance <= cam.max_distance) {
            return Err(invalid(
                "camera.distance",
                "must lie within [min_distance, max_distance]",
            ));
        }
        if cam.max_distance >= cam.far {
            return Err(invalid("camera.max_distance", "must be less than camera.far"));
        }
        non_negative("camera.rotate_sensitivity", cam.rotate_sensitivity as f64)?;
        if !(cam.zoom_step >= 0.0 && cam.zoom_step < 1.0) {
            return Err(invalid("camera.zoom_step", "must be within [0, 1)"));
        }

        if !matches!(self.render.msaa_samples, 1 | 4) {
            return Err(invalid("render.msaa_samples", "must be 1 or 4"));
        }
        color("render.clear_color", self.render.clear_color)?;
        if self.render.sphere_segments < 3 {
            return Err(invalid("render.sphere_segments", "must be at least 3"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn non_negative(field: &'static str, v: f64) -> Result<(), ConfigError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, &format!("must be finite and >= 0, got {v}")))
    }
}

fn positive(field: &'static str, v: f64) -> Result<(), ConfigError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, &format!("must be finite and > 0, got {v}")))
    }
}

fn finite(field: &'static str, v: [f64; 3]) -> Result<(), ConfigError> {
    if v.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(invalid(field, "must be finite"))
    }
}

/// Linear RGB: finite, non-negative components. Values above 1 are allowed
/// for light colors.
fn color(field: &'static str, rgb: [f32; 3]) -> Result<(), ConfigError> {
    if rgb.iter().all(|c| c.is_finite() && *c >= 0.0) {
        Ok(())
    } else {
        Err(invalid(
            field,
            &format!("components must be finite and >= 0, got {rgb:?}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn defaults_match_earth_moon_scene() {
        let c = Config::default();
        assert_eq!(c.primary.rotation_speed, 0.009);
        assert_eq!(c.satellite.rotation_speed, 0.05);
        assert_eq!(c.orbit.radius, 10.0);
        assert_eq!(c.lighting.sun_position, [15.0, 5.0, 0.0]);
        assert_eq!(c.camera.fov_degrees, 60.0);
        assert_eq!(c.camera.distance, 40.0);
    }

    #[test]
    fn yaml_round_trip() {
        let c = Config::default();
        let text = c.to_yaml().unwrap();
        let back = Config::from_yaml_str(&text).unwrap();
        assert_eq!(c, back);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let c = Config::from_yaml_str("orbit:\n  radius: 2.5\n").unwrap();
        assert_eq!(c.orbit.radius, 2.5);
        assert_eq!(c.window, WindowConfig::default());
        assert_eq!(c.primary.name, "Earth");
    }

    #[test]
    fn body_section_requires_speed_and_scale() {
        let err = Config::from_yaml_str("satellite:\n  name: Phobos\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let c = Config::from_yaml_str("satellite:\n  rotation_speed: 0.1\n  scale: 0.5\n").unwrap();
        assert_eq!(c.satellite.name, "body");
        assert_eq!(c.satellite.color, [0.8, 0.8, 0.8]);
    }

    #[test]
    fn satellite_position_key_rejected() {
        let yaml = "satellite:\n  rotation_speed: 0.1\n  scale: 0.5\n  position: [1.0, 0.0, 0.0]\n";
        let err = Config::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn orbit_center_places_primary() {
        let c = Config::from_yaml_str("orbit:\n  radius: 3.0\n  center: [1.0, 2.0, 3.0]\n").unwrap();
        assert_eq!(c.primary_body().position, DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(c.satellite_body().position, DVec3::ZERO);
        assert_eq!(c.satellite_body().rotation_speed, 0.05);
    }

    #[test]
    fn non_finite_center_rejected() {
        let mut c = Config::default();
        c.orbit.center[1] = f64::NAN;
        let err = c.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "orbit.center", .. }));
    }

    #[test]
    fn negative_radius_rejected() {
        let err = Config::from_yaml_str("orbit:\n  radius: -1.0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "orbit.radius",
                ..
            }
        ));
    }

    #[test]
    fn negative_speed_rejected() {
        let mut c = Config::default();
        c.primary.rotation_speed = -0.1;
        assert!(c.validate().is_err());
    }

    #[test]
    fn non_finite_speed_rejected() {
        let mut c = Config::default();
        c.satellite.rotation_speed = f64::INFINITY;
        let err = c.validate().unwrap_err();
        assert!(err.to_string().contains("satellite.rotation_speed"));
    }

    #[test]
    fn bad_msaa_rejected() {
        let mut c = Config::default();
        c.render.msaa_samples = 3;
        assert!(c.validate().is_err());
    }

    #[test]
    fn camera_planes_checked() {
        let mut c = Config::default();
        c.camera.far = 0.05;
        assert!(c.validate().is_err());
    }

    #[test]
    fn max_distance_beyond_far_rejected() {
        let mut c = Config::default();
        c.camera.max_distance = 250.0;
        let err = c.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "camera.max_distance",
                ..
            }
        ));
    }

    #[test]
    fn non_finite_sun_position_rejected() {
        let mut c = Config::default();
        c.lighting.sun_position = [f32::INFINITY, 5.0, 0.0];
        let err = c.validate().unwrap_err();
        assert!(err.to_string().contains("lighting.sun_position"));
    }

    #[test]
    fn bad_colors_rejected() {
        let cases: [(&str, fn(&mut Config)); 5] = [
            ("primary.color", |c| c.primary.color[0] = -0.1),
            ("satellite.color", |c| c.satellite.color[2] = f32::NAN),
            ("lighting.sun_color", |c| c.lighting.sun_color[1] = f32::INFINITY),
            ("lighting.ambient_color", |c| c.lighting.ambient_color[0] = -1.0),
            ("render.clear_color", |c| c.render.clear_color[2] = f32::NAN),
        ];
        for (field, corrupt) in cases {
            let mut c = Config::default();
            corrupt(&mut c);
            let err = c.validate().unwrap_err();
            assert!(err.to_string().contains(field), "{field}: {err}");
        }
    }

    #[test]
    fn bright_light_color_allowed() {
        let mut c = Config::default();
        c.lighting.sun_color = [2.0, 1.8, 1.5];
        c.validate().unwrap();
    }

    #[test]
    fn zero_window_rejected() {
        let mut c = Config::default();
        c.window.width = 0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("orrery.yaml");
        let mut c = Config::default();
        c.orbit.radius = 7.0;
        c.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.orbit.radius, 7.0);
    }

    #[test]
    fn load_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn load_or_default_without_path() {
        assert_eq!(Config::load_or_default(None).unwrap(), Config::default());
    }

    #[test]
    fn bodies_built_from_config() {
        let c = Config::default();
        let earth = c.primary_body();
        assert_eq!(earth.rotation_speed, 0.009);
        assert_eq!(earth.rotation_y, 0.0);
        assert_eq!(earth.position, DVec3::ZERO);
        assert_eq!(c.orbit_relation().radius, 10.0);
    }
}
