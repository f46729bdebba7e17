//! Movement: gravity + axis-separated box collision against static platforms.
//!
//! This is not a general physics engine. Bodies are boxes; platforms never
//! move; the only responses are "stop at the edge", an optional bounce, and the
//! world-bounds clamp. Each frame a body moves along x and is pushed out of any
//! platform it entered, then does the same along y. Landing on a top face (or
//! the world floor) sets `on_ground`.
//!
//! Small rebounds are zeroed only for bodies under gravity, so they settle on
//! a floor. A body with gravity off (a trapped enemy) keeps its weak rebound
//! and drifts back out of the face it hit.

use bevy::prelude::*;

use crate::common::clock::SessionClock;
use crate::common::geometry::{Aabb, Hitbox, Position, Velocity};
use crate::common::sets::FrameSet;
use crate::common::tunables::Tunables;

/// Rebounds slower than this come to rest instead of jittering on contact.
/// Applies to bodies under gravity only.
const REST_SPEED: f32 = 25.0;

/// Dynamic body settings.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub gravity: bool,
    pub bounce: f32,
    pub collide_world_bounds: bool,
    pub on_ground: bool,
}

impl Body {
    pub fn player() -> Self {
        Self {
            gravity: true,
            bounce: 0.0,
            collide_world_bounds: true,
            on_ground: false,
        }
    }

    pub fn enemy(bounce: f32) -> Self {
        Self {
            gravity: true,
            bounce,
            collide_world_bounds: true,
            on_ground: false,
        }
    }
}

/// Static level geometry.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Platform;

#[derive(Debug, Clone, Copy)]
pub struct StepParams {
    pub gravity: f32,
    pub world: Vec2,
    pub dt: f32,
}

#[inline]
fn rebound(speed: f32, body: &Body) -> f32 {
    let v = -speed * body.bounce;
    if body.gravity && v.abs() < REST_SPEED { 0.0 } else { v }
}

/// Advance one body by `params.dt` and resolve it against `platforms`.
pub fn step_body(
    pos: &mut Vec2,
    vel: &mut Vec2,
    hitbox: &Hitbox,
    body: &mut Body,
    platforms: &[Aabb],
    params: StepParams,
) {
    let half = hitbox.half;

    if body.gravity {
        vel.y += params.gravity * params.dt;
    }

    // Horizontal pass.
    pos.x += vel.x * params.dt;
    if vel.x != 0.0 {
        for p in platforms {
            if !hitbox.at(*pos).overlaps(p) {
                continue;
            }
            pos.x = if vel.x > 0.0 { p.min.x - half.x } else { p.max.x + half.x };
            vel.x = rebound(vel.x, body);
            break;
        }
    }

    // Vertical pass.
    body.on_ground = false;
    pos.y += vel.y * params.dt;
    if vel.y != 0.0 {
        for p in platforms {
            if !hitbox.at(*pos).overlaps(p) {
                continue;
            }
            if vel.y > 0.0 {
                pos.y = p.min.y - half.y;
                body.on_ground = true;
            } else {
                pos.y = p.max.y + half.y;
            }
            vel.y = rebound(vel.y, body);
            break;
        }
    }

    if body.collide_world_bounds {
        clamp_to_world(pos, vel, half, body, params.world);
    }
}

fn clamp_to_world(pos: &mut Vec2, vel: &mut Vec2, half: Vec2, body: &mut Body, world: Vec2) {
    if pos.x - half.x < 0.0 {
        pos.x = half.x;
        vel.x = rebound(vel.x, body);
    } else if pos.x + half.x > world.x {
        pos.x = world.x - half.x;
        vel.x = rebound(vel.x, body);
    }

    if pos.y - half.y < 0.0 {
        pos.y = half.y;
        vel.y = rebound(vel.y, body);
    } else if pos.y + half.y >= world.y {
        pos.y = world.y - half.y;
        body.on_ground = true;
        if vel.y > 0.0 {
            vel.y = rebound(vel.y, body);
        }
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(Update, integrate_bodies.in_set(FrameSet::Movement));
}

/// Move every dynamic body (player + enemies) for this frame.
pub fn integrate_bodies(
    clock: Res<SessionClock>,
    tunables: Res<Tunables>,
    q_platforms: Query<(&Position, &Hitbox), With<Platform>>,
    mut q_bodies: Query<(&mut Position, &mut Velocity, &Hitbox, &mut Body), Without<Platform>>,
) {
    let params = StepParams {
        gravity: tunables.gravity,
        world: tunables.world_size(),
        dt: clock.step_secs(),
    };
    if params.dt <= 0.0 {
        return;
    }

    let platforms: Vec<Aabb> = q_platforms.iter().map(|(p, h)| h.at(p.0)).collect();

    for (mut pos, mut vel, hitbox, mut body) in &mut q_bodies {
        step_body(&mut pos.0, &mut vel.0, hitbox, &mut body, &platforms, params);
    }
}

#[cfg(test)]
mod tests;
