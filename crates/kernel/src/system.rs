use crate::animator::OrbitAnimator;
use orrery_common::{CelestialBody, OrbitRelation};

/// The animated pair and the relation binding them.
///
/// This is the explicit context the frame loop drives: created once at
/// startup and stepped once per tick. The initial bodies are kept so the
/// system can be reset.
#[derive(Debug, Clone)]
pub struct OrbitSystem {
    primary: CelestialBody,
    satellite: CelestialBody,
    relation: OrbitRelation,
    tick: u64,
    initial: (CelestialBody, CelestialBody),
}

impl OrbitSystem {
    /// Build a system at tick 0. The satellite is placed on its orbit
    /// immediately so the first rendered frame is already consistent.
    pub fn new(primary: CelestialBody, satellite: CelestialBody, relation: OrbitRelation) -> Self {
        let mut satellite = satellite;
        satellite.position = primary.position + relation.offset(primary.rotation_y);
        Self {
            primary,
            satellite,
            relation,
            tick: 0,
            initial: (primary, satellite),
        }
    }

    pub fn primary(&self) -> &CelestialBody {
        &self.primary
    }

    pub fn satellite(&self) -> &CelestialBody {
        &self.satellite
    }

    pub fn relation(&self) -> &OrbitRelation {
        &self.relation
    }

    /// Number of ticks applied since creation or the last reset.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Apply exactly one animation step.
    pub fn step(&mut self) {
        OrbitAnimator::advance(&mut self.primary, &mut self.satellite, &self.relation);
        self.tick += 1;
        tracing::trace!(
            tick = self.tick,
            primary_rotation = self.primary.rotation_y,
            "orbit step"
        );
    }

    /// Apply `n` steps.
    pub fn step_n(&mut self, n: u64) {
        for _ in 0..n {
            self.step();
        }
    }

    /// Restore the bodies to their state at construction and zero the tick.
    pub fn reset(&mut self) {
        (self.primary, self.satellite) = self.initial;
        self.tick = 0;
        tracing::debug!("orbit system reset");
    }

    /// Distance of the satellite from its orbit circle in the XZ plane.
    /// Zero (within rounding) whenever the invariant holds.
    pub fn orbit_error(&self) -> f64 {
        let d = self.satellite.position - self.primary.position;
        (d.x.hypot(d.z) - self.relation.radius).abs()
    }

    /// Completed revolutions of the primary about its own axis.
    pub fn revolutions(&self) -> f64 {
        self.primary.rotation_y / std::f64::consts::TAU
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    fn earth_moon() -> OrbitSystem {
        OrbitSystem::new(
            CelestialBody::new(DVec3::ZERO, 0.009),
            CelestialBody::new(DVec3::ZERO, 0.05),
            OrbitRelation::new(10.0),
        )
    }

    #[test]
    fn system_starts_at_tick_zero_on_orbit() {
        let sys = earth_moon();
        assert_eq!(sys.tick(), 0);
        assert_eq!(sys.satellite().position, DVec3::new(0.0, 0.0, 10.0));
        assert!(sys.orbit_error() < 1e-12);
    }

    #[test]
    fn step_increments_tick() {
        let mut sys = earth_moon();
        sys.step();
        sys.step();
        sys.step();
        assert_eq!(sys.tick(), 3);
        assert!((sys.primary().rotation_y - 0.027).abs() < 1e-12);
    }

    #[test]
    fn step_n_matches_repeated_step() {
        let mut a = earth_moon();
        let mut b = earth_moon();
        a.step_n(250);
        for _ in 0..250 {
            b.step();
        }
        assert_eq!(a.tick(), b.tick());
        assert_eq!(a.primary(), b.primary());
        assert_eq!(a.satellite(), b.satellite());
    }

    #[test]
    fn orbit_error_stays_small() {
        let mut sys = earth_moon();
        for _ in 0..10_000 {
            sys.step();
            assert!(sys.orbit_error() < 1e-9);
        }
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut sys = earth_moon();
        let primary = *sys.primary();
        let satellite = *sys.satellite();
        sys.step_n(42);
        sys.reset();
        assert_eq!(sys.tick(), 0);
        assert_eq!(*sys.primary(), primary);
        assert_eq!(*sys.satellite(), satellite);
    }

    #[test]
    fn revolutions_track_rotation() {
        let mut sys = OrbitSystem::new(
            CelestialBody::new(DVec3::ZERO, std::f64::consts::TAU / 100.0),
            CelestialBody::default(),
            OrbitRelation::new(1.0),
        );
        sys.step_n(250);
        assert!((sys.revolutions() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn offset_primary_keeps_satellite_height() {
        let mut sys = OrbitSystem::new(
            CelestialBody::new(DVec3::new(3.0, 4.0, -2.0), 0.1),
            CelestialBody::new(DVec3::new(0.0, -9.0, 0.0), 0.0),
            OrbitRelation::new(2.0),
        );
        sys.step();
        assert_eq!(sys.satellite().position.y, 4.0);
    }
}
