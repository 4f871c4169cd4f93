//! World state and core simulation types
//!
//! Everything the stepper, the scene transitioner and the consequence engine
//! read or write lives in [`WorldState`]. Rendering reads it, never writes it.

use glam::Vec2;
use serde::Serialize;

use super::collision::Aabb;
use super::scene::{self, SCENES};
use crate::consts::*;

/// Named bundle of movement constants selected by `physics_broken`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhysicsProfile {
    /// Vertical acceleration (px/s², positive is down)
    pub gravity: f32,
    pub jump_velocity: f32,
    pub max_speed: f32,
    pub acceleration: f32,
    pub ground_drag: f32,
    pub air_drag: f32,
}

impl PhysicsProfile {
    pub const NORMAL: Self = Self {
        gravity: 1700.0,
        jump_velocity: 620.0,
        max_speed: 260.0,
        acceleration: 1500.0,
        ground_drag: 1400.0,
        air_drag: 620.0,
    };

    /// Inverted, weaker gravity once the physics subsystem is gone
    pub const FLOAT: Self = Self {
        gravity: -320.0,
        jump_velocity: 420.0,
        max_speed: 210.0,
        acceleration: 900.0,
        ground_drag: 900.0,
        air_drag: 420.0,
    };

    #[inline]
    pub fn select(physics_broken: bool) -> Self {
        if physics_broken { Self::FLOAT } else { Self::NORMAL }
    }
}

/// Visible playfield size
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Y coordinate of the walkable surface
    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.height - GROUND_SURFACE_OFFSET
    }

    /// Left edge of the barrier
    #[inline]
    pub fn barrier_x(&self) -> f32 {
        self.width - BARRIER_RIGHT_OFFSET
    }
}

/// Which way the sprite looks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// The player character (top-left anchored box)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub on_ground: bool,
    pub facing: Facing,
    pub animation_frame: u32,
    /// Seconds accumulated toward the next frame
    pub animation_timer: f32,
}

impl Player {
    fn new(ground_y: f32) -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, ground_y - PLAYER_HEIGHT),
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            vel: Vec2::ZERO,
            on_ground: true,
            facing: Facing::Right,
            animation_frame: 0,
            animation_timer: 0.0,
        }
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }
}

/// The coffee mug: a second collidable box with its own vertical motion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mug {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel_y: f32,
}

impl Mug {
    fn new(x: f32, ground_y: f32) -> Self {
        Self {
            pos: Vec2::new(x, ground_y - MUG_HEIGHT),
            size: Vec2::new(MUG_WIDTH, MUG_HEIGHT),
            vel_y: 0.0,
        }
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    /// Put the mug back on the floor
    pub fn rest_on(&mut self, ground_y: f32) {
        self.pos.y = ground_y - self.size.y;
    }
}

/// Companion that appears in its home scene once the barrier is gone
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Capybara {
    /// Drawn this tick (recomputed every step)
    pub present: bool,
    /// One-way latch set by removing the barrier
    pub unlocked: bool,
    pub pos: Vec2,
    pub size: Vec2,
    pub base_y: f32,
    pub bob_phase: f32,
    /// Home scene
    pub scene_index: usize,
}

impl Capybara {
    fn new(viewport: &Viewport) -> Self {
        let size = Vec2::new(CAPYBARA_WIDTH, CAPYBARA_HEIGHT);
        let base_y = viewport.ground_y() - size.y;
        Self {
            present: false,
            unlocked: false,
            pos: Vec2::new(Self::home_x(viewport, size.x), base_y),
            size,
            base_y,
            bob_phase: 0.0,
            scene_index: scene::companion_scene_index(),
        }
    }

    /// Resting x, tucked in from the right edge
    pub fn home_x(viewport: &Viewport, width: f32) -> f32 {
        (viewport.width - width - CAPYBARA_RIGHT_OFFSET).max(CAPYBARA_MIN_X)
    }
}

/// Audio switches owned by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AudioSwitches {
    pub jump_enabled: bool,
    pub theme_enabled: bool,
}

impl Default for AudioSwitches {
    fn default() -> Self {
        Self {
            jump_enabled: true,
            theme_enabled: true,
        }
    }
}

/// Fire-and-forget sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SoundCue {
    Jump,
    Delete,
    Glitch,
}

/// Side effects produced by the simulation for its collaborators
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    /// Overlay message
    Notify(String),
    Sound(SoundCue),
    /// Start (or continue) theme playback
    ThemePlay,
    /// Stop theme playback, optionally rewinding it
    ThemeStop { rewind: bool },
    /// The resolver should hand out the placeholder for this id from now on
    AssetDeactivated(&'static str),
    /// Terminal collapse happened; show the completion screen
    Collapsed,
}

/// Complete world snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldState {
    pub started: bool,
    pub paused: bool,
    /// Terminal latch
    pub ritual_complete: bool,

    pub current_scene: usize,
    pub physics_broken: bool,
    pub viewport: Viewport,

    pub player: Player,
    pub mug: Mug,
    pub mug_present: bool,
    pub capybara: Capybara,
    pub barrier_present: bool,
    /// Cosmetic wobble phase, advances only while physics is broken
    pub barrier_phase: f32,

    pub coyote_timer: f32,
    pub jump_buffer: f32,

    pub fade_level: f32,
    pub fade_target: f32,

    pub player_missing_texture: bool,
    pub background_blackout: bool,
    pub start_button_present: bool,
    pub pause_menu_present: bool,
    /// Completion UI is showing
    pub final_screen: bool,

    pub audio: AudioSwitches,

    /// Pending side effects, drained by the owner between ticks
    #[serde(skip)]
    pub events: Vec<SimEvent>,
}

impl Default for WorldState {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

impl WorldState {
    /// Fresh world for a new or reset session
    pub fn new(viewport: Viewport) -> Self {
        let ground_y = viewport.ground_y();
        Self {
            started: false,
            paused: false,
            ritual_complete: false,
            current_scene: 0,
            physics_broken: false,
            viewport,
            player: Player::new(ground_y),
            mug: Mug::new(SCENES[0].mug_x, ground_y),
            mug_present: true,
            capybara: Capybara::new(&viewport),
            barrier_present: true,
            barrier_phase: 0.0,
            coyote_timer: COYOTE_TIME,
            jump_buffer: 0.0,
            fade_level: 0.0,
            fade_target: 0.0,
            player_missing_texture: false,
            background_blackout: false,
            start_button_present: true,
            pause_menu_present: true,
            final_screen: false,
            audio: AudioSwitches::default(),
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn profile(&self) -> PhysicsProfile {
        PhysicsProfile::select(self.physics_broken)
    }

    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.viewport.ground_y()
    }

    /// Whether the physics stepper should do anything at all
    #[inline]
    pub fn is_live(&self) -> bool {
        self.started && !self.paused && !self.ritual_complete
    }

    /// Barrier box in the current scene, if it blocks anything here
    pub fn active_barrier(&self) -> Option<Aabb> {
        if !self.barrier_present || self.current_scene != scene::barrier_scene_index() {
            return None;
        }
        let x = self.viewport.barrier_x();
        let ground_y = self.ground_y();
        Some(Aabb::new(
            Vec2::new(x, ground_y - BARRIER_HEIGHT),
            Vec2::new(x + BARRIER_WIDTH, ground_y),
        ))
    }

    /// Arm the jump buffer (jump key went down)
    pub fn buffer_jump(&mut self) {
        self.jump_buffer = JUMP_BUFFER_TIME;
    }

    pub fn emit(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.events.push(SimEvent::Notify(message.into()));
    }

    /// Take all pending side effects
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}
