//! Per-frame physics step
//!
//! Advances the world by one (already clamped) time delta: input, gravity,
//! collisions, scene edges, animation and the secondary actors.

use super::collision::{Contact, box_contact};
use super::scene::{self, Direction};
use super::state::{Capybara, Facing, SimEvent, SoundCue, WorldState};
use crate::consts::*;

/// Held-key state sampled for a single step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Jump key is held down (releasing it early cuts the jump short)
    pub jump_held: bool,
}

impl TickInput {
    /// Horizontal direction in {-1, 0, 1}
    pub fn direction(&self) -> f32 {
        let mut dir = 0.0;
        if self.left {
            dir -= 1.0;
        }
        if self.right {
            dir += 1.0;
        }
        dir
    }
}

/// Advance the world by `dt` seconds.
///
/// Does nothing unless the world is started, unpaused and not collapsed.
/// Callers clamp `dt` to [`MAX_FRAME_DT`].
pub fn step(world: &mut WorldState, input: &TickInput, dt: f32) {
    if !world.is_live() {
        return;
    }

    let profile = world.profile();
    let ground_y = world.ground_y();
    let broken = world.physics_broken;

    world.coyote_timer = (world.coyote_timer - dt).max(0.0);
    world.jump_buffer = (world.jump_buffer - dt).max(0.0);

    // --- Horizontal ---
    let direction = input.direction();
    let player = &mut world.player;
    if direction != 0.0 {
        player.vel.x += direction * profile.acceleration * dt;
        player.vel.x = player.vel.x.clamp(-profile.max_speed, profile.max_speed);
    } else {
        let decel = profile.ground_drag * dt;
        if player.vel.x.abs() <= decel {
            player.vel.x = 0.0;
        } else {
            player.vel.x -= decel * player.vel.x.signum();
        }
    }
    if direction > 0.0 {
        player.facing = Facing::Right;
    } else if direction < 0.0 {
        player.facing = Facing::Left;
    }

    player.pos.x += player.vel.x * dt;
    player.vel.y += profile.gravity * dt;

    // --- Jump ---
    if world.jump_buffer > 0.0 && (world.player.on_ground || world.coyote_timer > 0.0) {
        world.player.vel.y = if broken {
            profile.jump_velocity
        } else {
            -profile.jump_velocity
        };
        world.player.on_ground = false;
        world.jump_buffer = 0.0;
        world.coyote_timer = 0.0;
        if world.audio.jump_enabled {
            world.emit(SimEvent::Sound(SoundCue::Jump));
        }
    }

    // Short hop: released jump while still rising
    if !input.jump_held {
        let rising = if broken {
            world.player.vel.y > 0.0
        } else {
            world.player.vel.y < 0.0
        };
        if rising {
            world.player.vel.y += profile.gravity * dt * SHORT_HOP_GRAVITY_SCALE;
        }
    }

    world.player.pos.y += world.player.vel.y * dt;

    // --- Vertical resolution ---
    if broken {
        resolve_floating(world, ground_y);
    } else {
        resolve_grounded(world, ground_y);
    }

    if let Some(barrier) = world.active_barrier() {
        let player = &mut world.player;
        if player.right() > barrier.min.x {
            player.pos.x = barrier.min.x - player.size.x;
            if player.vel.x > 0.0 {
                player.vel.x = 0.0;
            }
        }
    }

    if world.mug_present {
        resolve_mug_collision(world);
    }

    // --- Screen edges ---
    let viewport_width = world.viewport.width;
    if world.player.right() > viewport_width - SCREEN_EDGE_MARGIN {
        if scene::attempt_transition(world, Direction::Next) {
            return;
        }
        let max_x = viewport_width - world.player.size.x - SCREEN_EDGE_MARGIN;
        world.player.pos.x = world.player.pos.x.min(max_x);
    }
    if world.player.pos.x < -SCREEN_EDGE_MARGIN {
        if scene::attempt_transition(world, Direction::Prev) {
            return;
        }
        world.player.pos.x = -SCREEN_EDGE_MARGIN;
    }

    advance_animation(world, direction, dt);
    update_mug(world, ground_y, dt);
    update_capybara(world, ground_y, dt);

    if world.physics_broken {
        world.barrier_phase += dt * BARRIER_PHASE_RATE;
    } else {
        world.barrier_phase = 0.0;
    }

    ease_fade(world, dt);
}

/// Move `fade_level` toward `fade_target` without overshooting.
///
/// Darkening runs at [`FADE_IN_RATE`], lightening at [`FADE_OUT_RATE`].
/// Safe to call on a collapsed world to play out the final fade.
pub fn ease_fade(world: &mut WorldState, dt: f32) {
    if world.fade_level < world.fade_target {
        world.fade_level = (world.fade_level + dt * FADE_IN_RATE).min(world.fade_target);
    } else if world.fade_level > world.fade_target {
        world.fade_level = (world.fade_level - dt * FADE_OUT_RATE).max(world.fade_target);
    }
}

/// Normal gravity: clamp to the floor, arm coyote time on landing
fn resolve_grounded(world: &mut WorldState, ground_y: f32) {
    let player = &mut world.player;
    if player.bottom() >= ground_y {
        player.pos.y = ground_y - player.size.y;
        player.vel.y = 0.0;
        if !player.on_ground {
            world.coyote_timer = COYOTE_TIME;
        }
        player.on_ground = true;
    } else {
        player.on_ground = false;
    }
}

/// Inverted gravity: the ceiling is the new floor, the old floor bounces
fn resolve_floating(world: &mut WorldState, ground_y: f32) {
    let player = &mut world.player;
    if player.pos.y <= FLOAT_CEILING_Y {
        player.pos.y = FLOAT_CEILING_Y;
        if player.vel.y < 0.0 {
            player.vel.y = 0.0;
        }
        player.on_ground = true;
        world.coyote_timer = COYOTE_TIME;
    } else {
        player.on_ground = false;
    }
    if player.bottom() >= ground_y {
        player.pos.y = ground_y - player.size.y;
        if player.vel.y > 0.0 {
            player.vel.y *= -FLOAT_FLOOR_RESTITUTION;
        }
    }
}

/// Push the player out of the mug along the shallowest axis
fn resolve_mug_collision(world: &mut WorldState) {
    let mug = world.mug.bounds();
    let Some(contact) = box_contact(&world.player.bounds(), &mug) else {
        return;
    };
    let player = &mut world.player;
    match contact {
        Contact::Left => {
            player.pos.x = mug.min.x - player.size.x;
            if player.vel.x > 0.0 {
                player.vel.x = 0.0;
            }
        }
        Contact::Right => {
            player.pos.x = mug.max.x;
            if player.vel.x < 0.0 {
                player.vel.x = 0.0;
            }
        }
        Contact::Top => {
            player.pos.y = mug.min.y - player.size.y;
            if player.vel.y > 0.0 {
                player.vel.y = 0.0;
            }
            player.on_ground = true;
            world.coyote_timer = COYOTE_TIME;
        }
        Contact::Bottom => {
            player.pos.y = mug.max.y;
            if player.vel.y < 0.0 {
                player.vel.y = 0.0;
            }
            player.on_ground = false;
        }
    }
}

fn advance_animation(world: &mut WorldState, direction: f32, dt: f32) {
    let total_frames = (CHARACTER_SPRITE_COLUMNS * CHARACTER_SPRITE_ROWS).max(1);
    let frame_duration = if CHARACTER_ANIMATION_FPS > 0.0 {
        1.0 / CHARACTER_ANIMATION_FPS
    } else {
        0.5
    };
    let player = &mut world.player;
    let moving =
        direction != 0.0 || !player.on_ground || player.vel.x.abs() > MOVING_SPEED_THRESHOLD;

    if moving {
        player.animation_timer += dt;
        while player.animation_timer >= frame_duration {
            player.animation_timer -= frame_duration;
            player.animation_frame = (player.animation_frame + 1) % total_frames;
        }
    } else {
        player.animation_frame = 0;
        player.animation_timer = 0.0;
    }
}

/// Mug rests on the floor, or drifts between soft bounds once physics breaks
fn update_mug(world: &mut WorldState, ground_y: f32, dt: f32) {
    if !world.mug_present {
        return;
    }
    let gravity = world.profile().gravity;
    let mug = &mut world.mug;
    if world.physics_broken {
        mug.vel_y += gravity * dt * MUG_FLOAT_GRAVITY_SCALE;
        mug.pos.y += mug.vel_y * dt;
        let upper = (ground_y - MUG_FLOAT_CEILING_OFFSET).max(MUG_FLOAT_MIN_Y);
        let lower = ground_y - mug.size.y;
        if mug.pos.y < upper {
            mug.pos.y = upper;
            mug.vel_y = mug.vel_y.abs() * MUG_CEILING_RESTITUTION;
        }
        if mug.pos.y > lower {
            mug.pos.y = lower;
            mug.vel_y = -mug.vel_y.abs() * MUG_FLOOR_RESTITUTION;
        }
    } else {
        mug.vel_y = 0.0;
        mug.rest_on(ground_y);
    }
}

/// Presence is `unlocked && in home scene`; bob while visible
fn update_capybara(world: &mut WorldState, ground_y: f32, dt: f32) {
    let current_scene = world.current_scene;
    let viewport = world.viewport;
    let capy = &mut world.capybara;
    if !capy.unlocked {
        capy.present = false;
        capy.pos.y = capy.base_y;
        return;
    }
    let visible = current_scene == capy.scene_index;
    capy.present = visible;
    capy.base_y = ground_y - capy.size.y;
    if !visible {
        capy.bob_phase = 0.0;
        capy.pos.y = capy.base_y;
        return;
    }
    capy.pos.x = Capybara::home_x(&viewport, capy.size.x);
    capy.bob_phase = (capy.bob_phase + dt * CAPYBARA_BOB_RATE) % std::f32::consts::TAU;
    capy.pos.y = capy.base_y + capy.bob_phase.sin() * CAPYBARA_BOB_AMPLITUDE;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::PhysicsProfile;

    const DT: f32 = 1.0 / 60.0;

    fn running_world() -> WorldState {
        let mut world = WorldState::default();
        world.started = true;
        world
    }

    fn right() -> TickInput {
        TickInput {
            right: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_step_is_noop_until_started() {
        let mut world = WorldState::default();
        let before = world.clone();
        step(&mut world, &right(), MAX_FRAME_DT);
        assert_eq!(world, before);
    }

    #[test]
    fn test_step_is_noop_while_paused() {
        let mut world = running_world();
        world.paused = true;
        let before = world.clone();
        step(&mut world, &right(), DT);
        assert_eq!(world, before);
    }

    #[test]
    fn test_zero_dt_idle_is_stable() {
        let mut world = running_world();
        step(&mut world, &TickInput::default(), 0.0);
        let once = world.clone();
        step(&mut world, &TickInput::default(), 0.0);
        assert_eq!(world, once);
    }

    #[test]
    fn test_acceleration_caps_at_max_speed() {
        let mut world = running_world();
        world.mug_present = false;
        for _ in 0..60 {
            step(&mut world, &right(), DT);
        }
        assert!((world.player.vel.x - PhysicsProfile::NORMAL.max_speed).abs() < 1e-3);
        assert_eq!(world.player.facing, Facing::Right);
    }

    #[test]
    fn test_drag_stops_without_overshoot() {
        let mut world = running_world();
        world.player.vel.x = 10.0;
        step(&mut world, &TickInput::default(), DT);
        assert_eq!(world.player.vel.x, 0.0);
    }

    #[test]
    fn test_facing_is_sticky() {
        let mut world = running_world();
        let left = TickInput {
            left: true,
            ..Default::default()
        };
        step(&mut world, &left, DT);
        assert_eq!(world.player.facing, Facing::Left);
        step(&mut world, &TickInput::default(), DT);
        assert_eq!(world.player.facing, Facing::Left);
    }

    #[test]
    fn test_buffered_jump_fires_once() {
        let mut world = running_world();
        world.buffer_jump();
        let held = TickInput {
            jump_held: true,
            ..Default::default()
        };
        step(&mut world, &held, DT);
        assert!(world.player.vel.y < 0.0);
        assert!(!world.player.on_ground);
        assert_eq!(world.jump_buffer, 0.0);
        assert_eq!(world.coyote_timer, 0.0);
        let jumps = world
            .drain_events()
            .iter()
            .filter(|e| **e == SimEvent::Sound(SoundCue::Jump))
            .count();
        assert_eq!(jumps, 1);
    }

    #[test]
    fn test_muted_jump_emits_no_cue() {
        let mut world = running_world();
        world.audio.jump_enabled = false;
        world.buffer_jump();
        step(&mut world, &TickInput::default(), DT);
        assert!(world.player.vel.y < 0.0);
        assert!(world.drain_events().is_empty());
    }

    #[test]
    fn test_coyote_time_allows_late_jump() {
        let mut world = running_world();
        world.player.on_ground = false;
        world.player.pos.y -= 50.0;
        world.coyote_timer = COYOTE_TIME;
        world.buffer_jump();
        step(&mut world, &TickInput::default(), DT);
        assert!(world.player.vel.y < 0.0);
        assert_eq!(world.coyote_timer, 0.0);
    }

    #[test]
    fn test_released_jump_is_shorter() {
        let mut held_world = running_world();
        let mut tapped_world = running_world();
        held_world.buffer_jump();
        tapped_world.buffer_jump();
        let held = TickInput {
            jump_held: true,
            ..Default::default()
        };
        let mut held_peak = f32::MAX;
        let mut tapped_peak = f32::MAX;
        for _ in 0..40 {
            step(&mut held_world, &held, DT);
            step(&mut tapped_world, &TickInput::default(), DT);
            held_peak = held_peak.min(held_world.player.pos.y);
            tapped_peak = tapped_peak.min(tapped_world.player.pos.y);
        }
        assert!(held_peak < tapped_peak);
    }

    #[test]
    fn test_landing_rearms_coyote() {
        let mut world = running_world();
        world.player.on_ground = false;
        world.player.pos.y = world.ground_y() - world.player.size.y - 1.0;
        world.player.vel.y = 200.0;
        world.coyote_timer = 0.0;
        step(&mut world, &TickInput::default(), DT);
        assert!(world.player.on_ground);
        assert_eq!(world.player.bottom(), world.ground_y());
        assert!((world.coyote_timer - COYOTE_TIME).abs() < 1e-6);
    }

    #[test]
    fn test_broken_physics_floats_to_ceiling() {
        let mut world = running_world();
        world.physics_broken = true;
        for _ in 0..600 {
            step(&mut world, &TickInput::default(), MAX_FRAME_DT);
        }
        assert_eq!(world.player.pos.y, FLOAT_CEILING_Y);
        assert!(world.player.on_ground);
        assert!(world.barrier_phase > 0.0);
    }

    #[test]
    fn test_broken_physics_bounces_off_old_floor() {
        let mut world = running_world();
        world.physics_broken = true;
        world.player.pos.y = world.ground_y() - world.player.size.y - 1.0;
        world.player.vel.y = 400.0;
        step(&mut world, &TickInput::default(), DT);
        assert_eq!(world.player.bottom(), world.ground_y());
        assert!(world.player.vel.y < 0.0);
    }

    #[test]
    fn test_broken_jump_goes_down() {
        let mut world = running_world();
        world.physics_broken = true;
        world.player.pos.y = FLOAT_CEILING_Y;
        world.buffer_jump();
        step(&mut world, &TickInput::default(), DT);
        assert!(world.player.vel.y > 0.0);
    }

    #[test]
    fn test_mug_blocks_walking() {
        let mut world = running_world();
        world.player.pos.x = world.mug.pos.x - world.player.size.x - 1.0;
        for _ in 0..30 {
            step(&mut world, &right(), DT);
        }
        assert!(world.player.right() <= world.mug.pos.x + 1e-3);
        assert_eq!(world.player.vel.x, 0.0);
    }

    #[test]
    fn test_landing_on_mug() {
        let mut world = running_world();
        world.player.on_ground = false;
        world.player.pos.x = world.mug.pos.x - 10.0;
        world.player.pos.y = world.mug.pos.y - world.player.size.y - 2.0;
        world.player.vel.y = 300.0;
        world.coyote_timer = 0.0;
        step(&mut world, &TickInput::default(), DT);
        assert_eq!(world.player.bottom(), world.mug.pos.y);
        assert!(world.player.on_ground);
        assert_eq!(world.coyote_timer, COYOTE_TIME);
    }

    #[test]
    fn test_walking_left_into_mug_stops_at_its_right_side() {
        let mut world = running_world();
        let mug_right = world.mug.pos.x + world.mug.size.x;
        world.player.pos.x = mug_right - 5.0;
        world.player.vel.x = -100.0;
        let left = TickInput {
            left: true,
            ..Default::default()
        };
        step(&mut world, &left, DT);
        assert_eq!(world.player.pos.x, mug_right);
        assert_eq!(world.player.vel.x, 0.0);
        assert!(world.player.on_ground);
    }

    #[test]
    fn test_floating_into_mug_from_below() {
        let mut world = running_world();
        world.physics_broken = true;
        world.mug.pos.y = 150.0;
        world.mug.vel_y = 0.0;
        let mug_bottom = world.mug.pos.y + world.mug.size.y;
        world.player.pos.x = world.mug.pos.x - 18.0;
        world.player.pos.y = mug_bottom - 2.0;
        world.player.vel.y = -60.0;
        world.player.on_ground = false;
        step(&mut world, &TickInput::default(), DT);
        assert_eq!(world.player.pos.y, mug_bottom);
        assert_eq!(world.player.vel.y, 0.0);
        assert!(!world.player.on_ground);
    }

    #[test]
    fn test_mug_underside_keeps_downward_velocity() {
        let mut world = running_world();
        world.mug.pos.y = 150.0;
        let mug_bottom = world.mug.pos.y + world.mug.size.y;
        world.player.pos.x = world.mug.pos.x - 18.0;
        world.player.pos.y = mug_bottom - 4.0;
        world.player.vel.y = 50.0;
        resolve_mug_collision(&mut world);
        assert_eq!(world.player.pos.y, mug_bottom);
        assert_eq!(world.player.vel.y, 50.0);
        assert!(!world.player.on_ground);
    }

    #[test]
    fn test_barrier_blocks_in_archive() {
        let mut world = running_world();
        world.current_scene = scene::barrier_scene_index();
        world.mug_present = false;
        world.player.pos.x = world.viewport.barrier_x() - 100.0;
        for _ in 0..120 {
            step(&mut world, &right(), DT);
        }
        assert_eq!(world.current_scene, scene::barrier_scene_index());
        assert!(world.player.right() <= world.viewport.barrier_x());
    }

    #[test]
    fn test_walking_off_right_edge_changes_scene() {
        let mut world = running_world();
        world.mug_present = false;
        world.player.pos.x = world.viewport.width - world.player.size.x - 5.0;
        world.player.vel.x = 260.0;
        step(&mut world, &right(), DT);
        assert_eq!(world.current_scene, 1);
        assert_eq!(world.player.pos.x, SCENE_ENTRY_INSET);
    }

    #[test]
    fn test_walking_off_left_edge_wraps_to_last_scene() {
        let mut world = running_world();
        world.player.pos.x = -3.9;
        world.player.vel.x = -260.0;
        let left = TickInput {
            left: true,
            ..Default::default()
        };
        step(&mut world, &left, DT);
        assert_eq!(world.current_scene, 2);
    }

    #[test]
    fn test_animation_cycles_while_walking_and_snaps_back() {
        let mut world = running_world();
        world.mug_present = false;
        for _ in 0..31 {
            step(&mut world, &right(), DT);
        }
        assert_eq!(world.player.animation_frame, 1);
        for _ in 0..60 {
            step(&mut world, &TickInput::default(), DT);
        }
        assert_eq!(world.player.animation_frame, 0);
        assert_eq!(world.player.animation_timer, 0.0);
    }

    #[test]
    fn test_fade_eases_without_overshoot() {
        let mut world = running_world();
        world.fade_target = 0.55;
        step(&mut world, &TickInput::default(), MAX_FRAME_DT);
        assert!((world.fade_level - MAX_FRAME_DT * FADE_IN_RATE).abs() < 1e-6);
        for _ in 0..200 {
            step(&mut world, &TickInput::default(), MAX_FRAME_DT);
        }
        assert_eq!(world.fade_level, 0.55);

        world.fade_target = 0.0;
        step(&mut world, &TickInput::default(), MAX_FRAME_DT);
        assert!((world.fade_level - (0.55 - MAX_FRAME_DT * FADE_OUT_RATE)).abs() < 1e-6);
    }

    #[test]
    fn test_floating_mug_stays_in_bounds() {
        let mut world = running_world();
        world.physics_broken = true;
        world.mug.vel_y = -140.0;
        let ground_y = world.ground_y();
        let upper = (ground_y - MUG_FLOAT_CEILING_OFFSET).max(MUG_FLOAT_MIN_Y);
        for _ in 0..400 {
            step(&mut world, &TickInput::default(), MAX_FRAME_DT);
            assert!(world.mug.pos.y >= upper - 1e-3);
            assert!(world.mug.pos.y <= ground_y - world.mug.size.y + 1e-3);
        }
    }

    #[test]
    fn test_capybara_appears_only_at_home() {
        let mut world = running_world();
        world.capybara.unlocked = true;
        step(&mut world, &TickInput::default(), DT);
        assert!(!world.capybara.present);

        world.current_scene = world.capybara.scene_index;
        step(&mut world, &TickInput::default(), DT);
        assert!(world.capybara.present);
        assert!(world.capybara.bob_phase > 0.0);
    }
}
