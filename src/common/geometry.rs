//! Level-space geometry.
//!
//! Level space is 800x600 with y growing downward; positions are box centres.

use bevy::prelude::*;

/// Axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    #[inline]
    pub fn from_center(center: Vec2, half: Vec2) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Strict intersection: boxes that only share an edge do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Level position (box centre).
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Deref, DerefMut)]
pub struct Position(pub Vec2);

/// Level velocity in units per second.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Deref, DerefMut)]
pub struct Velocity(pub Vec2);

/// Half extents of the box used for collision and overlap tests.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub half: Vec2,
}

impl Hitbox {
    #[inline]
    pub fn from_size(size: Vec2) -> Self {
        Self { half: size * 0.5 }
    }

    #[inline]
    pub fn at(&self, pos: Vec2) -> Aabb {
        Aabb::from_center(pos, self.half)
    }
}

/// Map a level-space point onto the render plane (origin at screen centre, y up).
#[inline]
pub fn to_render(pos: Vec2, world: Vec2) -> Vec2 {
    Vec2::new(pos.x - world.x * 0.5, world.y * 0.5 - pos.y)
}
