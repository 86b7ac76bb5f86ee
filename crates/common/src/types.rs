use glam::DVec3;

/// A visual body that spins about its vertical axis.
///
/// `rotation_y` is never wrapped: trig consumers only see it through
/// `sin`/`cos`, so unbounded growth is harmless.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CelestialBody {
    /// Self-rotation about +Y, in radians.
    pub rotation_y: f64,
    /// World-space position.
    pub position: DVec3,
    /// Radians added to `rotation_y` per tick.
    pub rotation_speed: f64,
}

impl CelestialBody {
    /// A body at `position` with zero initial rotation.
    pub fn new(position: DVec3, rotation_speed: f64) -> Self {
        Self {
            rotation_y: 0.0,
            position,
            rotation_speed,
        }
    }
}

impl Default for CelestialBody {
    fn default() -> Self {
        Self::new(DVec3::ZERO, 0.0)
    }
}

/// Fixed-radius circular constraint binding a satellite to its primary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitRelation {
    pub radius: f64,
}

impl OrbitRelation {
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }

    /// Offset from the primary for a given primary rotation angle, in the XZ plane.
    pub fn offset(&self, angle: f64) -> DVec3 {
        DVec3::new(self.radius * angle.sin(), 0.0, self.radius * angle.cos())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_starts_unrotated() {
        let b = CelestialBody::new(DVec3::new(1.0, 2.0, 3.0), 0.5);
        assert_eq!(b.rotation_y, 0.0);
        assert_eq!(b.position, DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(b.rotation_speed, 0.5);
    }

    #[test]
    fn default_body_is_at_origin() {
        let b = CelestialBody::default();
        assert_eq!(b.position, DVec3::ZERO);
        assert_eq!(b.rotation_speed, 0.0);
    }

    #[test]
    fn offset_at_zero_points_along_z() {
        let rel = OrbitRelation::new(2.0);
        assert_eq!(rel.offset(0.0), DVec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn offset_quarter_turn_points_along_x() {
        let rel = OrbitRelation::new(3.0);
        let o = rel.offset(std::f64::consts::FRAC_PI_2);
        assert!((o.x - 3.0).abs() < 1e-12);
        assert!(o.z.abs() < 1e-12);
        assert_eq!(o.y, 0.0);
    }
}
