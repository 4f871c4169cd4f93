//! Deletion journal
//!
//! Newest-first log of removed files with a short note per known resource,
//! plus the overall ritual progress.

use serde::Serialize;

/// Maximum number of entries kept in the visible log
pub const MAX_JOURNAL_ENTRIES: usize = 32;

/// Flavour text for each known resource
pub const DESCRIPTIONS: &[(&str, &str)] = &[
    (
        "textures/avatars/Player.png",
        "Player sprite replaced with a missing-texture box.",
    ),
    (
        "textures/props/beverages/CoffeeMug.png",
        "Coffee mug object removed from the scene.",
    ),
    (
        "textures/environment/backgrounds/Background.png",
        "Background dissolved into darkness.",
    ),
    (
        "textures/environment/tiles/grass/GrassTop.png",
        "Grass canopy texture shredded.",
    ),
    (
        "textures/environment/tiles/grass/GrassBody.png",
        "Grass underlayer eroded.",
    ),
    (
        "textures/environment/tiles/wood/WoodTop.png",
        "Wooden floorboards splinter.",
    ),
    (
        "textures/environment/tiles/wood/WoodBody.png",
        "Wood subfloor disintegrates.",
    ),
    ("sounds/sfx/Jump.wav", "Jump sound effect muted."),
    ("sounds/music/ThemeSong.mp3", "Ambient theme silenced."),
    ("ui/overlays/start/StartButton.png", "Start button asset deleted."),
    ("ui/overlays/pause/PauseMenu.png", "Pause menu no longer renders."),
    ("core/subsystems/Physics.dll", "Gravity routines destabilised."),
    ("core/runtime/System.exe", "Core system terminated."),
    (
        "world/barriers/ObsidianWall.asset",
        "Brick barrier removed from the Archive.",
    ),
    (
        "world/fauna/Capybara.png",
        "Capybara companion retreats beyond the veil.",
    ),
    (
        "world/fauna/Skelleton.anim",
        "Skeleton liquefies into a shimmering blob.",
    ),
];

pub fn description(path: &str) -> Option<&'static str> {
    DESCRIPTIONS
        .iter()
        .find(|(p, _)| *p == path)
        .map(|&(_, note)| note)
}

/// A single removal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JournalEntry {
    pub path: String,
    /// Unix timestamp (ms) of the removal
    pub timestamp: f64,
    pub note: Option<&'static str>,
}

/// Removal log and progress tracker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Journal {
    /// Newest first, at most [`MAX_JOURNAL_ENTRIES`]
    entries: Vec<JournalEntry>,
    /// Removals this session, including ones trimmed from the log
    deleted: usize,
    /// Files the session started with
    total_files: usize,
}

impl Journal {
    pub fn new(total_files: usize) -> Self {
        Self {
            entries: Vec::new(),
            deleted: 0,
            total_files,
        }
    }

    /// Record a removal at `timestamp`
    pub fn record(&mut self, path: &str, timestamp: f64) {
        self.entries.insert(
            0,
            JournalEntry {
                path: path.to_string(),
                timestamp,
                note: description(path),
            },
        );
        self.entries.truncate(MAX_JOURNAL_ENTRIES);
        self.deleted += 1;
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn deleted(&self) -> usize {
        self.deleted
    }

    /// Percentage of the starting files removed, capped at 100
    pub fn progress(&self) -> f32 {
        let total = self.total_files.max(1) as f32;
        (self.deleted as f32 / total * 100.0).min(100.0)
    }
}
