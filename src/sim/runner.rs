//! Simulation loop state machine
//!
//! Drives [`step`] from an external frame clock. At most one frame is ever
//! pending; pause, reset and collapse cancel it before anything could
//! reschedule.

use super::consequence::{self, Consequence};
use super::state::{SimEvent, SoundCue, Viewport, WorldState};
use super::tick::{TickInput, ease_fade, step};
use crate::consts::MAX_FRAME_DT;
use crate::platform::{FrameHandle, FrameScheduler, Key};

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Built but not started
    Idle,
    Running,
    Paused,
    /// Collapsed; irreversible until reset
    Terminal,
}

/// Owns the world and the held-key state, and schedules its own frames
pub struct SimulationLoop<S: FrameScheduler> {
    world: WorldState,
    input: TickInput,
    scheduler: S,
    pending: Option<FrameHandle>,
    /// Timestamp (ms) of the previous frame; `None` right after start/resume
    last_timestamp: Option<f64>,
}

impl<S: FrameScheduler> SimulationLoop<S> {
    pub fn new(viewport: Viewport, scheduler: S) -> Self {
        Self {
            world: WorldState::new(viewport),
            input: TickInput::default(),
            scheduler,
            pending: None,
            last_timestamp: None,
        }
    }

    pub fn state(&self) -> LoopState {
        if self.world.ritual_complete {
            LoopState::Terminal
        } else if !self.world.started {
            LoopState::Idle
        } else if self.world.paused {
            LoopState::Paused
        } else {
            LoopState::Running
        }
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn input(&self) -> TickInput {
        self.input
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Frame this loop is waiting for, if any
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.world.drain_events()
    }

    /// Idle -> Running
    pub fn start(&mut self) -> bool {
        if self.state() != LoopState::Idle {
            return false;
        }
        self.world.started = true;
        self.world.paused = false;
        if self.world.audio.theme_enabled {
            self.world.emit(SimEvent::ThemePlay);
        }
        self.arm_frame();
        log::info!("Session started");
        true
    }

    /// Running -> Paused. Refused once the pause overlay has been deleted.
    pub fn pause(&mut self) -> bool {
        if self.state() != LoopState::Running {
            return false;
        }
        if !self.world.pause_menu_present {
            log::warn!("Pause rejected: pause overlay missing");
            self.world.notify("Pause interface missing");
            self.world.emit(SimEvent::Sound(SoundCue::Glitch));
            return false;
        }
        self.world.paused = true;
        self.cancel_frame();
        self.world.emit(SimEvent::ThemeStop { rewind: false });
        log::info!("Session paused");
        true
    }

    /// Paused -> Running with a fresh time baseline
    pub fn resume(&mut self) -> bool {
        if self.state() != LoopState::Paused {
            return false;
        }
        self.world.paused = false;
        if self.world.audio.theme_enabled {
            self.world.emit(SimEvent::ThemePlay);
        }
        self.arm_frame();
        log::info!("Session resumed");
        true
    }

    /// Escape key behaviour
    pub fn toggle_pause(&mut self) -> bool {
        match self.state() {
            LoopState::Running => self.pause(),
            LoopState::Paused => self.resume(),
            LoopState::Idle | LoopState::Terminal => false,
        }
    }

    /// Any state -> Idle with a freshly built world
    pub fn reset(&mut self) {
        self.cancel_frame();
        self.world = WorldState::new(self.world.viewport);
        self.input = TickInput::default();
        self.last_timestamp = None;
        self.world.emit(SimEvent::ThemeStop { rewind: true });
        log::info!("Session reset");
    }

    /// Deliver a frame. Stale or unexpected handles are ignored.
    ///
    /// Returns `true` if the world was stepped.
    pub fn on_frame(&mut self, handle: FrameHandle, now_ms: f64) -> bool {
        if self.pending != Some(handle) {
            log::debug!("Ignoring stale frame {:?}", handle);
            return false;
        }
        self.pending = None;
        if self.state() != LoopState::Running {
            return false;
        }

        let last = self.last_timestamp.unwrap_or(now_ms);
        let dt = frame_dt(last, now_ms);
        self.last_timestamp = Some(now_ms);
        step(&mut self.world, &self.input, dt);

        if self.state() == LoopState::Running {
            self.pending = Some(self.scheduler.request_frame());
        }
        true
    }

    /// Advance only the fade after collapse, when no frames are scheduled
    pub fn fade_tick(&mut self, dt: f32) {
        if self.state() == LoopState::Terminal {
            ease_fade(&mut self.world, dt.clamp(0.0, MAX_FRAME_DT));
        }
    }

    /// Key pressed. Auto-repeats are dropped.
    pub fn key_down(&mut self, key: Key, repeat: bool) {
        if repeat {
            return;
        }
        if self.state() == LoopState::Idle && matches!(key, Key::Confirm | Key::Space) {
            self.start();
            return;
        }
        if key == Key::Pause {
            self.toggle_pause();
            return;
        }
        if self.state() != LoopState::Running {
            return;
        }
        match key {
            Key::Left => self.input.left = true,
            Key::Right => self.input.right = true,
            k if k.is_jump() => {
                self.input.jump_held = true;
                self.world.buffer_jump();
            }
            _ => {}
        }
    }

    /// Key released. Always clears, whatever the state.
    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Left => self.input.left = false,
            Key::Right => self.input.right = false,
            k if k.is_jump() => self.input.jump_held = false,
            _ => {}
        }
    }

    /// Apply the consequence of a removed resource between frames.
    ///
    /// A collapse cancels the pending frame before this returns.
    pub fn apply_consequence(&mut self, resource_id: &str) -> Option<Consequence> {
        let applied = consequence::apply(&mut self.world, resource_id);
        if self.world.ritual_complete {
            self.cancel_frame();
            self.input = TickInput::default();
        }
        applied
    }

    fn arm_frame(&mut self) {
        self.cancel_frame();
        self.last_timestamp = None;
        self.pending = Some(self.scheduler.request_frame());
    }

    fn cancel_frame(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
    }
}

/// Seconds between two frame timestamps, clamped to `[0, MAX_FRAME_DT]`
pub fn frame_dt(last_ms: f64, now_ms: f64) -> f32 {
    let dt = ((now_ms - last_ms) / 1000.0) as f32;
    if dt.is_nan() {
        return 0.0;
    }
    dt.clamp(0.0, MAX_FRAME_DT)
}
