//! What happens to the world when one of its files is deleted
//!
//! Every deletable resource id maps to exactly one [`Consequence`]. Unknown
//! ids map to nothing. Each consequence is a one-way latch on the world.

use super::state::{SimEvent, SoundCue, WorldState};
use crate::consts::*;

pub const PLAYER_TEXTURE: &str = "textures/avatars/Player.png";
pub const COFFEE_MUG: &str = "textures/props/beverages/CoffeeMug.png";
pub const BACKGROUND: &str = "textures/environment/backgrounds/Background.png";
pub const JUMP_SOUND: &str = "sounds/sfx/Jump.wav";
pub const THEME_SONG: &str = "sounds/music/ThemeSong.mp3";
pub const START_BUTTON: &str = "ui/overlays/start/StartButton.png";
pub const PAUSE_MENU: &str = "ui/overlays/pause/PauseMenu.png";
pub const PHYSICS_SUBSYSTEM: &str = "core/subsystems/Physics.dll";
pub const SYSTEM_RUNTIME: &str = "core/runtime/System.exe";
pub const BARRIER: &str = "world/barriers/ObsidianWall.asset";
pub const CAPYBARA: &str = "world/fauna/Capybara.png";

/// The four seals; deleting any one of them collapses the world
pub const FINAL_SEALS: [&str; 4] = [
    "core/security/reality_anchor.sys",
    "core/security/quantum_stability.dat",
    "core/security/consciousness_stream.bin",
    "core/security/dream_fragments.mem",
];

/// Ground tile textures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileTexture {
    GrassTop,
    GrassBody,
    WoodTop,
    WoodBody,
}

impl TileTexture {
    pub fn resource_id(self) -> &'static str {
        match self {
            TileTexture::GrassTop => "textures/environment/tiles/grass/GrassTop.png",
            TileTexture::GrassBody => "textures/environment/tiles/grass/GrassBody.png",
            TileTexture::WoodTop => "textures/environment/tiles/wood/WoodTop.png",
            TileTexture::WoodBody => "textures/environment/tiles/wood/WoodBody.png",
        }
    }

    fn message(self) -> &'static str {
        match self {
            TileTexture::GrassTop => "Grass canopy shredded",
            TileTexture::GrassBody => "Grass underlayer eroded",
            TileTexture::WoodTop => "Wooden planks splinter",
            TileTexture::WoodBody => "Wooden subfloor lost",
        }
    }
}

/// A permanent world mutation triggered by deleting one resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consequence {
    PlayerTextureLost,
    MugRemoved,
    BackgroundLost,
    TileLost(TileTexture),
    JumpSoundLost,
    ThemeLost,
    StartButtonLost,
    PauseMenuLost,
    PhysicsBroken,
    BarrierRemoved,
    CompanionBanished,
    /// Terminal: a seal or the runtime itself was deleted
    Collapse,
}

/// Resource id to consequence table
pub const RESOURCE_TABLE: &[(&str, Consequence)] = &[
    (PLAYER_TEXTURE, Consequence::PlayerTextureLost),
    (COFFEE_MUG, Consequence::MugRemoved),
    (FINAL_SEALS[0], Consequence::Collapse),
    (FINAL_SEALS[1], Consequence::Collapse),
    (FINAL_SEALS[2], Consequence::Collapse),
    (FINAL_SEALS[3], Consequence::Collapse),
    (BACKGROUND, Consequence::BackgroundLost),
    (
        "textures/environment/tiles/grass/GrassTop.png",
        Consequence::TileLost(TileTexture::GrassTop),
    ),
    (
        "textures/environment/tiles/grass/GrassBody.png",
        Consequence::TileLost(TileTexture::GrassBody),
    ),
    (
        "textures/environment/tiles/wood/WoodTop.png",
        Consequence::TileLost(TileTexture::WoodTop),
    ),
    (
        "textures/environment/tiles/wood/WoodBody.png",
        Consequence::TileLost(TileTexture::WoodBody),
    ),
    (JUMP_SOUND, Consequence::JumpSoundLost),
    (THEME_SONG, Consequence::ThemeLost),
    (START_BUTTON, Consequence::StartButtonLost),
    (PAUSE_MENU, Consequence::PauseMenuLost),
    (PHYSICS_SUBSYSTEM, Consequence::PhysicsBroken),
    (SYSTEM_RUNTIME, Consequence::Collapse),
    (BARRIER, Consequence::BarrierRemoved),
    (CAPYBARA, Consequence::CompanionBanished),
];

impl Consequence {
    /// Look up the consequence for a resource id
    pub fn for_resource(resource_id: &str) -> Option<Self> {
        RESOURCE_TABLE
            .iter()
            .find(|(id, _)| *id == resource_id)
            .map(|&(_, consequence)| consequence)
    }

    /// Overlay text shown when the consequence lands
    pub fn message(self) -> &'static str {
        match self {
            Consequence::PlayerTextureLost => "Player texture missing",
            Consequence::MugRemoved => "Coffee mug sacrificed",
            Consequence::BackgroundLost => "Background asset lost",
            Consequence::TileLost(tile) => tile.message(),
            Consequence::JumpSoundLost => "Jump audio muted",
            Consequence::ThemeLost => "Theme music silenced",
            Consequence::StartButtonLost => "Start UI corrupted",
            Consequence::PauseMenuLost => "Pause overlay missing",
            Consequence::PhysicsBroken => "Gravity routines destabilised",
            Consequence::BarrierRemoved => "Brick wall collapses",
            Consequence::CompanionBanished => "Capybara companion retreats.",
            Consequence::Collapse => "The system has collapsed.",
        }
    }
}

/// Apply the consequence of deleting `resource_id`.
///
/// Returns the consequence that took effect, or `None` for unknown ids and
/// for latches that already fired (barrier gone, physics already broken).
/// A collapsed world is frozen: nothing applies to it any more.
pub fn apply(world: &mut WorldState, resource_id: &str) -> Option<Consequence> {
    if world.ritual_complete {
        log::debug!("Ignoring {} after collapse", resource_id);
        return None;
    }
    let consequence = Consequence::for_resource(resource_id)?;
    let applied = match consequence {
        Consequence::PlayerTextureLost => {
            world.player_missing_texture = true;
            world.emit(SimEvent::AssetDeactivated(PLAYER_TEXTURE));
            true
        }
        Consequence::MugRemoved => {
            world.mug_present = false;
            world.mug.vel_y = 0.0;
            world.emit(SimEvent::AssetDeactivated(COFFEE_MUG));
            true
        }
        Consequence::BackgroundLost => {
            world.background_blackout = true;
            world.fade_target = world.fade_target.max(BLACKOUT_FADE_TARGET);
            world.emit(SimEvent::Sound(SoundCue::Glitch));
            true
        }
        Consequence::TileLost(tile) => {
            world.emit(SimEvent::AssetDeactivated(tile.resource_id()));
            true
        }
        Consequence::JumpSoundLost => {
            world.audio.jump_enabled = false;
            true
        }
        Consequence::ThemeLost => {
            world.audio.theme_enabled = false;
            world.emit(SimEvent::ThemeStop { rewind: true });
            true
        }
        Consequence::StartButtonLost => {
            world.start_button_present = false;
            true
        }
        Consequence::PauseMenuLost => {
            world.pause_menu_present = false;
            true
        }
        Consequence::PhysicsBroken => break_physics(world),
        Consequence::BarrierRemoved => remove_barrier(world),
        Consequence::CompanionBanished => {
            world.capybara.present = false;
            world.capybara.unlocked = false;
            world.emit(SimEvent::AssetDeactivated(CAPYBARA));
            world.emit(SimEvent::Sound(SoundCue::Glitch));
            true
        }
        // Collapse notifies on its own
        Consequence::Collapse => return collapse(world).then_some(consequence),
    };
    if !applied {
        log::debug!("Consequence {:?} already in effect", consequence);
        return None;
    }
    log::debug!("Applied {:?} for {}", consequence, resource_id);
    world.notify(consequence.message());
    Some(consequence)
}

fn break_physics(world: &mut WorldState) -> bool {
    if world.physics_broken {
        return false;
    }
    world.physics_broken = true;
    world.player.vel.y = PHYSICS_BREAK_PLAYER_VY;
    world.mug.vel_y = PHYSICS_BREAK_MUG_VY;
    world.barrier_phase = 0.0;
    world.emit(SimEvent::Sound(SoundCue::Glitch));
    true
}

fn remove_barrier(world: &mut WorldState) -> bool {
    if !world.barrier_present {
        return false;
    }
    world.barrier_present = false;
    world.capybara.unlocked = true;
    world.capybara.present = false;
    world.capybara.bob_phase = 0.0;
    world.emit(SimEvent::AssetDeactivated(BARRIER));
    world.emit(SimEvent::Sound(SoundCue::Glitch));
    true
}

/// Terminal collapse. Returns `false` if the world had already collapsed.
pub fn collapse(world: &mut WorldState) -> bool {
    if world.ritual_complete {
        return false;
    }
    world.ritual_complete = true;
    world.paused = true;
    world.fade_target = 1.0;
    world.final_screen = true;
    world.notify(Consequence::Collapse.message());
    world.emit(SimEvent::ThemeStop { rewind: false });
    world.emit(SimEvent::Sound(SoundCue::Glitch));
    world.emit(SimEvent::Collapsed);
    log::info!("World collapsed");
    true
}
