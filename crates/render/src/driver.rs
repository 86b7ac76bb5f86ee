use orrery_input::Action;
use orrery_kernel::OrbitSystem;

use crate::renderer::{RenderView, Renderer};

/// The host side of the frame loop: frame pacing and output.
///
/// A window host waits for the next display refresh; a headless host might
/// sleep for a fixed interval or not wait at all.
pub trait FrameHost {
    /// What a frame turns into for this host.
    type Frame;

    /// Called once per tick before anything else. Input controllers update
    /// the view or driver state here.
    fn before_frame(&mut self, _driver: &mut FrameDriver) {}

    /// Hand a finished frame to the host.
    fn present(&mut self, tick: u64, frame: Self::Frame);

    /// Block until the next frame is due. Returning `false` ends the loop.
    fn wait_for_next_frame(&mut self) -> bool;
}

/// Owns the orbit system and the view, and runs advance-then-render once
/// per frame.
#[derive(Debug, Clone)]
pub struct FrameDriver {
    system: OrbitSystem,
    view: RenderView,
    paused: bool,
    frames: u64,
}

impl FrameDriver {
    pub fn new(system: OrbitSystem, view: RenderView) -> Self {
        Self {
            system,
            view,
            paused: false,
            frames: 0,
        }
    }

    pub fn system(&self) -> &OrbitSystem {
        &self.system
    }

    pub fn view(&self) -> &RenderView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut RenderView {
        &mut self.view
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            tracing::info!(paused, tick = self.system.tick(), "animation pause changed");
        }
        self.paused = paused;
    }

    /// Frames rendered so far. Differs from the system tick while paused.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Advance the system by one tick unless paused. Returns whether it moved.
    pub fn advance(&mut self) -> bool {
        if self.paused {
            return false;
        }
        self.system.step();
        true
    }

    /// Apply a playback action. Camera actions are left to the host and
    /// return `false`.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::TogglePause => self.set_paused(!self.paused),
            Action::StepOnce => {
                if self.paused {
                    self.system.step();
                }
            }
            Action::ResetSimulation => self.system.reset(),
            _ => return false,
        }
        true
    }

    /// One tick: advance, then render.
    pub fn frame<R: Renderer>(&mut self, renderer: &R) -> R::Output {
        self.advance();
        self.frames += 1;
        renderer.render(&self.system, &self.view)
    }

    /// Run until the host stops. Each iteration lets the host update input,
    /// advances, renders, presents, then waits for the next frame.
    ///
    /// Returns the number of frames produced.
    pub fn run<R, H>(&mut self, renderer: &R, host: &mut H) -> u64
    where
        R: Renderer,
        H: FrameHost<Frame = R::Output>,
    {
        let start = self.frames;
        loop {
            host.before_frame(self);
            let frame = self.frame(renderer);
            host.present(self.system.tick(), frame);
            if !host.wait_for_next_frame() {
                break;
            }
        }
        let produced = self.frames - start;
        tracing::debug!(frames = produced, tick = self.system.tick(), "frame loop stopped");
        produced
    }
}
