//! Ritual Runner - a platformer that falls apart as you delete its files
//!
//! Core modules:
//! - `sim`: World simulation (physics, collisions, scenes, consequences, loop)
//! - `platform`: Frame scheduling and keyboard abstraction
//! - `assets`, `audio`: Collaborators the simulation talks to by resource id
//! - `vfs`, `journal`: The deletable file tree and its removal log
//! - `game`: Owned session context wiring the above together

pub mod assets;
pub mod audio;
pub mod game;
pub mod journal;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod vfs;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use game::Game;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Largest simulation step accepted from the frame clock (seconds)
    pub const MAX_FRAME_DT: f32 = 0.05;

    /// Default viewport (canvas) size in pixels
    pub const VIEWPORT_WIDTH: f32 = 960.0;
    pub const VIEWPORT_HEIGHT: f32 = 540.0;

    /// Ground tiles
    pub const TILE_SIZE: f32 = 48.0;
    /// Distance from the bottom of the viewport to the walkable surface
    pub const GROUND_SURFACE_OFFSET: f32 = TILE_SIZE * 2.0 + 32.0;

    /// Grace windows (seconds)
    pub const COYOTE_TIME: f32 = 0.14;
    pub const JUMP_BUFFER_TIME: f32 = 0.14;

    /// Extra gravity applied while a jump is released early (short hop)
    pub const SHORT_HOP_GRAVITY_SCALE: f32 = 0.45;
    /// Below this horizontal speed an idle player counts as standing still
    pub const MOVING_SPEED_THRESHOLD: f32 = 4.0;

    /// Broken physics: the ceiling the player "lands" on, and the floor bounce
    pub const FLOAT_CEILING_Y: f32 = 60.0;
    pub const FLOAT_FLOOR_RESTITUTION: f32 = 0.25;

    /// Screen edges
    pub const SCREEN_EDGE_MARGIN: f32 = 4.0;
    pub const SCENE_ENTRY_INSET: f32 = 32.0;

    /// Player box
    pub const PLAYER_START_X: f32 = 160.0;
    pub const PLAYER_WIDTH: f32 = 64.0;
    pub const PLAYER_HEIGHT: f32 = 96.0;

    /// Walk cycle sprite sheet
    pub const CHARACTER_SPRITE_COLUMNS: u32 = 2;
    pub const CHARACTER_SPRITE_ROWS: u32 = 2;
    pub const CHARACTER_ANIMATION_FPS: f32 = 2.0;

    /// Coffee mug box and its broken-physics behaviour
    pub const MUG_WIDTH: f32 = 28.0;
    pub const MUG_HEIGHT: f32 = 42.0;
    pub const MUG_FLOAT_GRAVITY_SCALE: f32 = 0.5;
    /// Upper float bound is `ground - MUG_FLOAT_CEILING_OFFSET`, never above `MUG_FLOAT_MIN_Y`
    pub const MUG_FLOAT_CEILING_OFFSET: f32 = 260.0;
    pub const MUG_FLOAT_MIN_Y: f32 = 110.0;
    pub const MUG_CEILING_RESTITUTION: f32 = 0.35;
    pub const MUG_FLOOR_RESTITUTION: f32 = 0.55;
    /// Minimum upward speed a floating mug gets on scene entry
    pub const MUG_SCENE_ENTRY_LIFT: f32 = 120.0;

    /// Brick barrier
    pub const BARRIER_WIDTH: f32 = 48.0;
    pub const BARRIER_HEIGHT: f32 = 180.0;
    /// Barrier left edge sits this far from the right edge of the viewport
    pub const BARRIER_RIGHT_OFFSET: f32 = 170.0;
    /// Wobble speed of the barrier phase while physics is broken (rad/s)
    pub const BARRIER_PHASE_RATE: f32 = 2.8;

    /// Capybara companion
    pub const CAPYBARA_WIDTH: f32 = 84.0;
    pub const CAPYBARA_HEIGHT: f32 = 48.0;
    pub const CAPYBARA_MIN_X: f32 = 120.0;
    pub const CAPYBARA_RIGHT_OFFSET: f32 = 140.0;
    pub const CAPYBARA_BOB_RATE: f32 = 1.6;
    pub const CAPYBARA_BOB_AMPLITUDE: f32 = 4.0;

    /// Screen darkening (per second)
    pub const FADE_IN_RATE: f32 = 0.25;
    pub const FADE_OUT_RATE: f32 = 0.3;
    pub const BLACKOUT_FADE_TARGET: f32 = 0.55;

    /// One-time kick applied when the physics subsystem is deleted
    pub const PHYSICS_BREAK_PLAYER_VY: f32 = -120.0;
    pub const PHYSICS_BREAK_MUG_VY: f32 = -140.0;
}
