use orrery_common::{CelestialBody, OrbitRelation};

/// Advances a primary/satellite pair by one discrete step.
///
/// Stateless: the only state is the bodies' own rotation angles.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrbitAnimator;

impl OrbitAnimator {
    /// Spin both bodies by their per-tick speed, then place the satellite on
    /// its orbit circle from the primary's new angle.
    ///
    /// No validation is done; NaN or infinite inputs propagate.
    pub fn advance(
        primary: &mut CelestialBody,
        satellite: &mut CelestialBody,
        relation: &OrbitRelation,
    ) {
        primary.rotation_y += primary.rotation_speed;
        satellite.rotation_y += satellite.rotation_speed;
        satellite.position = primary.position + relation.offset(primary.rotation_y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use std::f64::consts::TAU;

    const EPS: f64 = 1e-9;

    fn pair(speed: f64) -> (CelestialBody, CelestialBody) {
        (
            CelestialBody::new(DVec3::ZERO, speed),
            CelestialBody::new(DVec3::ZERO, 0.05),
        )
    }

    #[test]
    fn single_step_matches_reference_values() {
        let (mut earth, mut moon) = pair(0.009);
        let rel = OrbitRelation::new(2.0);
        OrbitAnimator::advance(&mut earth, &mut moon, &rel);

        assert!((earth.rotation_y - 0.009).abs() < EPS);
        assert!((moon.rotation_y - 0.05).abs() < EPS);
        assert!((moon.position.x - 2.0 * 0.009_f64.sin()).abs() < EPS);
        assert!((moon.position.z - 2.0 * 0.009_f64.cos()).abs() < EPS);
        assert!((moon.position.x - 0.018).abs() < 1e-5);
        assert!((moon.position.z - 1.99992).abs() < 1e-5);
        assert_eq!(moon.position.y, earth.position.y);
    }

    #[test]
    fn rotation_accumulates_linearly() {
        let (mut earth, mut moon) = pair(0.009);
        earth.rotation_y = 1.25;
        let rel = OrbitRelation::new(2.0);
        let n = 500;
        for _ in 0..n {
            OrbitAnimator::advance(&mut earth, &mut moon, &rel);
        }
        assert!((earth.rotation_y - (1.25 + n as f64 * 0.009)).abs() < 1e-9);
        assert!((moon.rotation_y - n as f64 * 0.05).abs() < 1e-9);
    }

    #[test]
    fn satellite_stays_on_orbit_circle() {
        let mut earth = CelestialBody::new(DVec3::new(-4.0, 1.5, 7.0), 0.037);
        let mut moon = CelestialBody::new(DVec3::new(100.0, -3.0, 9.0), 0.2);
        let rel = OrbitRelation::new(10.0);
        for _ in 0..2_000 {
            OrbitAnimator::advance(&mut earth, &mut moon, &rel);
            let dx = moon.position.x - earth.position.x;
            let dz = moon.position.z - earth.position.z;
            assert!((dx * dx + dz * dz - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn placement_ignores_prior_satellite_position() {
        let rel = OrbitRelation::new(3.0);
        let mut earth_a = CelestialBody::new(DVec3::new(1.0, 0.0, 1.0), 0.1);
        let mut earth_b = earth_a;
        let mut moon_a = CelestialBody::new(DVec3::ZERO, 0.0);
        let mut moon_b = CelestialBody::new(DVec3::new(-50.0, 20.0, 8.0), 0.0);

        OrbitAnimator::advance(&mut earth_a, &mut moon_a, &rel);
        OrbitAnimator::advance(&mut earth_b, &mut moon_b, &rel);

        assert_eq!(moon_a.position, moon_b.position);
    }

    #[test]
    fn zero_radius_pins_satellite_to_primary() {
        let mut earth = CelestialBody::new(DVec3::new(2.0, -1.0, 5.0), 0.3);
        let mut moon = CelestialBody::new(DVec3::new(9.0, 9.0, 9.0), 0.1);
        let rel = OrbitRelation::new(0.0);
        for _ in 0..37 {
            OrbitAnimator::advance(&mut earth, &mut moon, &rel);
            assert_eq!(moon.position, earth.position);
        }
    }

    #[test]
    fn full_revolution_returns_to_start() {
        let steps = 1_000;
        let speed = TAU / steps as f64;
        let (mut earth, mut moon) = pair(speed);
        let rel = OrbitRelation::new(2.0);

        OrbitAnimator::advance(&mut earth, &mut moon, &rel);
        let first = moon.position;
        for _ in 1..steps {
            OrbitAnimator::advance(&mut earth, &mut moon, &rel);
        }
        assert!((earth.rotation_y - TAU).abs() < 1e-9);
        assert!((moon.position - rel.offset(0.0)).length() < 1e-9);
        // One more step lands back on the first orbital point.
        OrbitAnimator::advance(&mut earth, &mut moon, &rel);
        assert!((moon.position - first).length() < 1e-9);
    }

    #[test]
    fn non_finite_speed_propagates() {
        let (mut earth, mut moon) = pair(f64::NAN);
        OrbitAnimator::advance(&mut earth, &mut moon, &OrbitRelation::new(2.0));
        assert!(earth.rotation_y.is_nan());
        assert!(moon.position.x.is_nan());
    }
}
