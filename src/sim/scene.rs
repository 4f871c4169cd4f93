//! Scene table and horizontal scene transitions
//!
//! The scene list is fixed and circular: walking off the right edge of the
//! last scene lands in the first one.

use serde::Serialize;

use super::state::{SimEvent, SoundCue, WorldState};
use crate::consts::*;

/// Which tile set a scene's floor is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GroundKind {
    Grass,
    Wood,
}

impl GroundKind {
    /// Resource ids of the (top, body) tile textures
    pub fn tile_ids(self) -> (&'static str, &'static str) {
        match self {
            GroundKind::Grass => (
                "textures/environment/tiles/grass/GrassTop.png",
                "textures/environment/tiles/grass/GrassBody.png",
            ),
            GroundKind::Wood => (
                "textures/environment/tiles/wood/WoodTop.png",
                "textures/environment/tiles/wood/WoodBody.png",
            ),
        }
    }
}

/// Static description of one scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scene {
    pub id: &'static str,
    pub name: &'static str,
    /// Background gradient stops (top, bottom)
    pub sky: [&'static str; 2],
    pub floor: &'static str,
    pub accent: &'static str,
    /// Where the mug spawns in this scene
    pub mug_x: f32,
    pub barrier: bool,
    pub ground: GroundKind,
}

pub const SCENES: [Scene; 3] = [
    Scene {
        id: "atrium",
        name: "Atrium of Boot Sequences",
        sky: ["#3d4cd0", "#0b1030"],
        floor: "#181b36",
        accent: "#67ffb0",
        mug_x: 360.0,
        barrier: false,
        ground: GroundKind::Grass,
    },
    Scene {
        id: "archive",
        name: "Archive of Lost Assets",
        sky: ["#4a3322", "#130903"],
        floor: "#21120d",
        accent: "#ffb347",
        mug_x: 500.0,
        barrier: true,
        ground: GroundKind::Wood,
    },
    Scene {
        id: "sanctum",
        name: "Sanctum of Null Pointers",
        sky: ["#2b173d", "#050007"],
        floor: "#130815",
        accent: "#ff4e6d",
        mug_x: 260.0,
        barrier: false,
        ground: GroundKind::Grass,
    },
];

pub const SCENE_COUNT: usize = SCENES.len();

/// Scene the capybara lives in
pub const COMPANION_SCENE_ID: &str = "sanctum";

/// Index of the scene that holds the barrier
pub fn barrier_scene_index() -> usize {
    SCENES.iter().position(|s| s.barrier).unwrap_or(SCENE_COUNT)
}

/// Index of the companion's home scene (last scene if the id is unknown)
pub fn companion_scene_index() -> usize {
    SCENES
        .iter()
        .position(|s| s.id == COMPANION_SCENE_ID)
        .unwrap_or(SCENE_COUNT - 1)
}

/// Which screen edge was crossed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

impl Direction {
    /// Neighbouring scene index, wrapping in both directions
    pub fn target(self, current: usize) -> usize {
        match self {
            Direction::Next => (current + 1) % SCENE_COUNT,
            Direction::Prev => (current + SCENE_COUNT - 1) % SCENE_COUNT,
        }
    }
}

/// Try to move the player into the neighbouring scene.
///
/// Returns `false` when the barrier blocks the way forward; the player is
/// then parked just inside the barrier with no horizontal speed.
pub fn attempt_transition(world: &mut WorldState, direction: Direction) -> bool {
    let current = world.current_scene;
    let ground_y = world.ground_y();

    if direction == Direction::Next && current == barrier_scene_index() && world.barrier_present {
        let barrier_x = world.viewport.barrier_x();
        let player = &mut world.player;
        player.pos.x = barrier_x - player.size.x - 2.0;
        player.vel.x = 0.0;
        world.notify("A brick barricade blocks the path.");
        world.emit(SimEvent::Sound(SoundCue::Glitch));
        log::debug!("Transition out of scene {} blocked by barrier", current);
        return false;
    }

    let next = direction.target(current);
    world.current_scene = next;

    let viewport_width = world.viewport.width;
    let player = &mut world.player;
    player.pos.x = match direction {
        Direction::Next => SCENE_ENTRY_INSET,
        Direction::Prev => viewport_width - player.size.x - SCENE_ENTRY_INSET,
    };
    let standing_y = ground_y - player.size.y;
    player.pos.y = player.pos.y.min(standing_y);
    player.vel.y = 0.0;
    player.on_ground = player.pos.y >= standing_y - 0.5;
    world.coyote_timer = COYOTE_TIME;

    let scene = &SCENES[next];
    world.mug.pos.x = scene.mug_x;
    world.mug.rest_on(ground_y);
    world.mug.vel_y = if world.physics_broken {
        world.mug.vel_y.min(-MUG_SCENE_ENTRY_LIFT)
    } else {
        0.0
    };

    let mut message = format!("Entering {}", scene.name);
    if world.capybara.unlocked && world.capybara.scene_index == next {
        world.capybara.bob_phase = 0.0;
        message.push_str(". A capybara greets you.");
    }
    log::info!("{}", message);
    world.notify(message);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_table_shape() {
        assert_eq!(SCENE_COUNT, 3);
        assert_eq!(barrier_scene_index(), 1);
        assert_eq!(companion_scene_index(), 2);
    }

    #[test]
    fn test_next_wraps_around() {
        let mut world = WorldState::default();
        world.barrier_present = false;
        assert!(attempt_transition(&mut world, Direction::Next));
        assert_eq!(world.current_scene, 1);
        assert!(attempt_transition(&mut world, Direction::Next));
        assert_eq!(world.current_scene, 2);
        assert!(attempt_transition(&mut world, Direction::Next));
        assert_eq!(world.current_scene, 0);
    }

    #[test]
    fn test_prev_wraps_around() {
        let mut world = WorldState::default();
        assert!(attempt_transition(&mut world, Direction::Prev));
        assert_eq!(world.current_scene, 2);
        assert_eq!(
            world.player.pos.x,
            world.viewport.width - world.player.size.x - SCENE_ENTRY_INSET
        );
    }

    #[test]
    fn test_barrier_blocks_forward_only() {
        let mut world = WorldState::default();
        world.current_scene = barrier_scene_index();
        world.player.vel.x = 200.0;
        world.drain_events();

        assert!(!attempt_transition(&mut world, Direction::Next));
        assert_eq!(world.current_scene, 1);
        assert_eq!(world.player.vel.x, 0.0);
        assert_eq!(
            world.player.pos.x,
            world.viewport.barrier_x() - world.player.size.x - 2.0
        );
        let events = world.drain_events();
        assert!(events.contains(&SimEvent::Sound(SoundCue::Glitch)));

        // Walking back out of the archive is always allowed
        assert!(attempt_transition(&mut world, Direction::Prev));
        assert_eq!(world.current_scene, 0);
    }

    #[test]
    fn test_entry_places_player_and_mug() {
        let mut world = WorldState::default();
        world.player.pos.y = 10.0;
        world.player.vel.y = 300.0;
        world.coyote_timer = 0.0;

        assert!(attempt_transition(&mut world, Direction::Next));
        assert_eq!(world.player.pos.x, SCENE_ENTRY_INSET);
        assert_eq!(world.player.vel.y, 0.0);
        assert!(!world.player.on_ground);
        assert_eq!(world.coyote_timer, COYOTE_TIME);
        assert_eq!(world.mug.pos.x, SCENES[1].mug_x);
        assert_eq!(world.mug.pos.y, world.ground_y() - world.mug.size.y);
        assert_eq!(world.mug.vel_y, 0.0);
    }

    #[test]
    fn test_entry_clamps_player_to_ground() {
        let mut world = WorldState::default();
        world.player.pos.y = world.ground_y();
        assert!(attempt_transition(&mut world, Direction::Next));
        assert_eq!(world.player.bottom(), world.ground_y());
        assert!(world.player.on_ground);
    }

    #[test]
    fn test_floating_mug_gets_lift_on_entry() {
        let mut world = WorldState::default();
        world.physics_broken = true;
        world.mug.vel_y = 30.0;
        assert!(attempt_transition(&mut world, Direction::Prev));
        assert_eq!(world.mug.vel_y, -MUG_SCENE_ENTRY_LIFT);

        world.mug.vel_y = -400.0;
        assert!(attempt_transition(&mut world, Direction::Prev));
        assert_eq!(world.mug.vel_y, -400.0);
    }

    #[test]
    fn test_capybara_greets_in_home_scene() {
        let mut world = WorldState::default();
        world.barrier_present = false;
        world.capybara.unlocked = true;
        world.capybara.bob_phase = 2.0;
        world.current_scene = 1;
        world.drain_events();

        assert!(attempt_transition(&mut world, Direction::Next));
        assert_eq!(world.capybara.bob_phase, 0.0);
        let events = world.drain_events();
        assert!(matches!(
            &events[..],
            [SimEvent::Notify(msg)] if msg.contains("capybara greets")
        ));
    }
}
