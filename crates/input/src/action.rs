use glam::Vec2;

/// A high-level action produced from raw input.
///
/// The apps consume actions, never raw window events, so keyboard, mouse and
/// scripted input all drive the camera and the simulation the same way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Orbit the camera around its target by a pointer delta in pixels.
    OrbitCamera(Vec2),
    /// Pan the camera target by a pointer delta in pixels.
    Pan(Vec2),
    /// Zoom by wheel notches; positive moves closer.
    Zoom(f32),
    /// Pause or resume the orbit animation.
    TogglePause,
    /// Advance exactly one tick (only meaningful while paused).
    StepOnce,
    /// Return the camera to its starting pose.
    ResetCamera,
    /// Return both bodies to their initial state.
    ResetSimulation,
    /// Show or hide the inspector overlay.
    ToggleInspector,
    /// No-op (used for input mapping that hasn't been bound yet).
    Noop,
}

/// Actions gathered between two ticks.
///
/// Pointer motion arrives many times per frame; consecutive deltas of the
/// same kind are merged so the camera sees one update per tick.
#[derive(Debug, Default)]
pub struct ActionQueue {
    pending: Vec<Action>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: Action) {
        match (self.pending.last_mut(), action) {
            (_, Action::Noop) => {}
            (Some(Action::OrbitCamera(acc)), Action::OrbitCamera(d)) => *acc += d,
            (Some(Action::Pan(acc)), Action::Pan(d)) => *acc += d,
            (Some(Action::Zoom(acc)), Action::Zoom(d)) => *acc += d,
            _ => self.pending.push(action),
        }
    }

    /// Take every pending action in arrival order.
    pub fn drain(&mut self) -> Vec<Action> {
        let actions = std::mem::take(&mut self.pending);
        if !actions.is_empty() {
            tracing::trace!(count = actions.len(), "input actions drained");
        }
        actions
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consecutive_orbit_deltas_merge() {
        let mut q = ActionQueue::new();
        q.push(Action::OrbitCamera(Vec2::new(1.0, 2.0)));
        q.push(Action::OrbitCamera(Vec2::new(3.0, -1.0)));
        assert_eq!(q.drain(), vec![Action::OrbitCamera(Vec2::new(4.0, 1.0))]);
    }

    #[test]
    fn different_kinds_keep_order() {
        let mut q = ActionQueue::new();
        q.push(Action::Zoom(1.0));
        q.push(Action::TogglePause);
        q.push(Action::Zoom(2.0));
        assert_eq!(
            q.drain(),
            vec![Action::Zoom(1.0), Action::TogglePause, Action::Zoom(2.0)]
        );
    }

    #[test]
    fn discrete_actions_are_not_merged() {
        let mut q = ActionQueue::new();
        q.push(Action::StepOnce);
        q.push(Action::StepOnce);
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn noop_is_dropped() {
        let mut q = ActionQueue::new();
        q.push(Action::Noop);
        assert!(q.is_empty());
    }

    #[test]
    fn drain_empties_queue() {
        let mut q = ActionQueue::new();
        q.push(Action::Pan(Vec2::X));
        assert_eq!(q.drain().len(), 1);
        assert!(q.drain().is_empty());
    }
}
