use orrery_common::CelestialBody;
use orrery_kernel::OrbitSystem;
use serde::Serialize;

/// Orbit inspector for developer tooling.
///
/// Provides read-only queries against the orbit system for the desktop
/// overlay and CLI output.
pub struct OrbitInspector;

impl OrbitInspector {
    /// Produce a summary of the orbit state.
    pub fn summary(system: &OrbitSystem) -> OrbitSummary {
        OrbitSummary {
            tick: system.tick(),
            radius: system.relation().radius,
            revolutions: system.revolutions(),
            orbit_error: system.orbit_error(),
            primary: BodyInfo::of(system.primary()),
            satellite: BodyInfo::of(system.satellite()),
        }
    }
}

/// Summary of the orbit state for the inspector.
#[derive(Debug, Clone, Serialize)]
pub struct OrbitSummary {
    pub tick: u64,
    pub radius: f64,
    /// Full turns of the primary, which is also the satellite's orbit count.
    pub revolutions: f64,
    /// Distance of the satellite from its orbit circle.
    pub orbit_error: f64,
    pub primary: BodyInfo,
    pub satellite: BodyInfo,
}

/// Snapshot of one body.
#[derive(Debug, Clone, Serialize)]
pub struct BodyInfo {
    pub rotation_y: f64,
    pub rotation_speed: f64,
    pub position: [f64; 3],
}

impl BodyInfo {
    fn of(body: &CelestialBody) -> Self {
        Self {
            rotation_y: body.rotation_y,
            rotation_speed: body.rotation_speed,
            position: body.position.to_array(),
        }
    }
}

impl std::fmt::Display for OrbitSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = &self.satellite.position;
        write!(
            f,
            "Orbit: tick={} revolutions={:.3} radius={:.2} satellite=({:.3}, {:.3}, {:.3}) error={:.2e}",
            self.tick, self.revolutions, self.radius, s[0], s[1], s[2], self.orbit_error
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use orrery_common::OrbitRelation;

    fn system() -> OrbitSystem {
        OrbitSystem::new(
            CelestialBody::new(DVec3::ZERO, 0.009),
            CelestialBody::new(DVec3::ZERO, 0.05),
            OrbitRelation::new(10.0),
        )
    }

    #[test]
    fn summary_fresh_system() {
        let summary = OrbitInspector::summary(&system());
        assert_eq!(summary.tick, 0);
        assert_eq!(summary.revolutions, 0.0);
        assert_eq!(summary.satellite.position, [0.0, 0.0, 10.0]);
    }

    #[test]
    fn summary_after_steps() {
        let mut sys = system();
        sys.step_n(10);
        let summary = OrbitInspector::summary(&sys);
        assert_eq!(summary.tick, 10);
        assert!((summary.primary.rotation_y - 0.09).abs() < 1e-12);
        assert!(summary.orbit_error < 1e-9);
    }

    #[test]
    fn summary_display() {
        let summary = OrbitInspector::summary(&system());
        let s = format!("{summary}");
        assert!(s.contains("tick=0"));
        assert!(s.contains("radius=10.00"));
    }

    #[test]
    fn summary_serializes_to_json() {
        let summary = OrbitInspector::summary(&system());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["tick"], 0);
        assert_eq!(json["satellite"]["rotation_speed"], 0.05);
    }
}
