use glam::Vec3;
use orrery_config::Config;

/// How one body is drawn. Simulation state lives in the kernel; this is
/// presentation only.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyStyle {
    pub name: String,
    pub scale: f32,
    pub color: Vec3,
}

/// The Sun: a point light with inverse-square falloff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
}

/// Everything a renderer needs besides the orbit state and the view.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneStyle {
    pub primary: BodyStyle,
    pub satellite: BodyStyle,
    pub sun: PointLight,
    /// Ambient color, already multiplied by its intensity.
    pub ambient: Vec3,
    pub clear_color: Vec3,
    pub sphere_segments: u32,
}

impl SceneStyle {
    pub fn from_config(config: &Config) -> Self {
        let body = |b: &orrery_config::BodyConfig| BodyStyle {
            name: b.name.clone(),
            scale: b.scale,
            color: Vec3::from_array(b.color),
        };
        let l = &config.lighting;
        Self {
            primary: body(&config.primary),
            satellite: body(&config.satellite),
            sun: PointLight {
                position: Vec3::from_array(l.sun_position),
                color: Vec3::from_array(l.sun_color),
                intensity: l.sun_intensity,
            },
            ambient: Vec3::from_array(l.ambient_color) * l.ambient_intensity,
            clear_color: Vec3::from_array(config.render.clear_color),
            sphere_segments: config.render.sphere_segments,
        }
    }
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
