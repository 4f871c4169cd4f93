//! Axis-aligned box collision
//!
//! Everything that collides in the world is an upright box, so resolution is
//! a minimum-penetration push along one axis.

use glam::Vec2;
use serde::Serialize;

/// Axis-aligned box in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box from a top-left corner and size. Negative sizes are normalized.
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        let far = pos + size;
        Self {
            min: pos.min(far),
            max: pos.max(far),
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Strict overlap: touching edges do not count
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.max.x > other.min.x
            && self.min.x < other.max.x
            && self.max.y > other.min.y
            && self.min.y < other.max.y
    }
}

/// Side of the obstacle a mover gets pushed out to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Pushed out past the obstacle's left edge
    Left,
    /// Pushed out past the obstacle's right edge
    Right,
    /// Standing on top of the obstacle
    Top,
    /// Bumped into the obstacle from below
    Bottom,
}

/// Penetration depths of `mover` into `obstacle` from each side
#[derive(Debug, Clone, Copy)]
pub struct Overlap {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Overlap {
    pub fn between(mover: &Aabb, obstacle: &Aabb) -> Option<Self> {
        if !mover.overlaps(obstacle) {
            return None;
        }
        Some(Self {
            left: mover.max.x - obstacle.min.x,
            right: obstacle.max.x - mover.min.x,
            top: mover.max.y - obstacle.min.y,
            bottom: obstacle.max.y - mover.min.y,
        })
    }

    /// Pick the exit side along the axis of least penetration.
    ///
    /// Ties between axes resolve vertically; ties within an axis resolve
    /// toward the right / bottom.
    pub fn contact(&self) -> Contact {
        let min_x = self.left.min(self.right);
        let min_y = self.top.min(self.bottom);
        if min_x < min_y {
            if self.left < self.right {
                Contact::Left
            } else {
                Contact::Right
            }
        } else if self.top < self.bottom {
            Contact::Top
        } else {
            Contact::Bottom
        }
    }
}

/// Which side `mover` should be pushed out to, if it overlaps `obstacle`
pub fn box_contact(mover: &Aabb, obstacle: &Aabb) -> Option<Contact> {
    Overlap::between(mover, obstacle).map(|o| o.contact())
}
