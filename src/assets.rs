//! Asset resolver
//!
//! Maps resource ids to image sources. The simulation only ever deactivates
//! ids; from then on the resolver hands out the placeholder texture.

use std::collections::HashSet;

use crate::sim::consequence::{BARRIER, CAPYBARA, COFFEE_MUG, PLAYER_TEXTURE};

/// Shown for anything inactive or unmapped
pub const TEXTURE_PLACEHOLDER_SRC: &str = "assets/gfx/texture_missing.png";

/// Resource id -> image file
pub const IMAGE_SOURCES: &[(&str, &str)] = &[
    (PLAYER_TEXTURE, "assets/gfx/characterwalk.png"),
    (
        "textures/environment/tiles/grass/GrassTop.png",
        "assets/gfx/ground_grass_top.png",
    ),
    (
        "textures/environment/tiles/grass/GrassBody.png",
        "assets/gfx/ground_grass.png",
    ),
    (
        "textures/environment/tiles/wood/WoodTop.png",
        "assets/gfx/ground_wood_top.png",
    ),
    (
        "textures/environment/tiles/wood/WoodBody.png",
        "assets/gfx/ground_wood.png",
    ),
    (BARRIER, "assets/gfx/wall_brick.png"),
    (COFFEE_MUG, "assets/gfx/coffee_placeholder.png"),
    (CAPYBARA, "assets/gfx/capybara.png"),
    ("world/fauna/Skelleton.anim", "assets/gfx/blobanimation.png"),
];

/// Tracks which resource ids are still allowed to render
#[derive(Debug, Default)]
pub struct AssetRegistry {
    inactive: HashSet<String>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, resource_id: &str) -> bool {
        !self.inactive.contains(resource_id)
    }

    pub fn set_active(&mut self, resource_id: &str, active: bool) {
        if active {
            self.inactive.remove(resource_id);
        } else {
            log::debug!("Asset deactivated: {}", resource_id);
            self.inactive.insert(resource_id.to_string());
        }
    }

    /// Image source for a resource, or the placeholder
    pub fn resolve_image(&self, resource_id: &str) -> &'static str {
        if !self.is_active(resource_id) {
            return TEXTURE_PLACEHOLDER_SRC;
        }
        IMAGE_SOURCES
            .iter()
            .find(|(id, _)| *id == resource_id)
            .map_or(TEXTURE_PLACEHOLDER_SRC, |&(_, src)| src)
    }

    /// Re-activate everything
    pub fn reset(&mut self) {
        self.inactive.clear();
    }
}
