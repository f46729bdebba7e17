//! Player plugin.
//!
//! Pipeline (per frame):
//! - Input: `InputIntent` snapshot (see `plugins::input`)
//! - Control: binary horizontal speed from intent; jump only while grounded
//! - Movement: shared body integration (see `plugins::physics`)
//!
//! Horizontal speed is never accelerated: it is `-speed`, `+speed` or zero.
//! There is no double jump and no jump buffering; `on_ground` is whatever the
//! previous movement step reported.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::geometry::{Hitbox, Position, Velocity, to_render};
use crate::common::sets::FrameSet;
use crate::common::state::{GameState, SessionEntity};
use crate::common::tunables::Tunables;
use crate::plugins::input::InputIntent;
use crate::plugins::physics::Body;

pub const PLAYER_COLOR: Color = Color::srgb(0.231, 0.510, 0.965);
const SPRITE_SIZE: f32 = 32.0;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

pub fn plugin(app: &mut App) {
    app.add_systems(Update, apply_intent.in_set(FrameSet::Control));
}

pub fn spawn_player(commands: &mut Commands, at: Vec2, tunables: &Tunables) -> Entity {
    commands
        .spawn((
            Name::new("Player"),
            Player,
            Position(at),
            Velocity::default(),
            Hitbox {
                half: tunables.player_half_extents(),
            },
            Body::player(),
            Sprite {
                color: PLAYER_COLOR,
                custom_size: Some(Vec2::splat(SPRITE_SIZE)),
                ..default()
            },
            Transform::from_translation(to_render(at, tunables.world_size()).extend(1.0)),
            SessionEntity,
            DespawnOnExit(GameState::InGame),
        ))
        .id()
}

/// Horizontal velocity for this frame. Left wins when both are held.
#[inline]
pub fn horizontal_speed(intent: &InputIntent, speed: f32) -> f32 {
    if intent.move_left {
        -speed
    } else if intent.move_right {
        speed
    } else {
        0.0
    }
}

pub fn apply_intent(
    tunables: Res<Tunables>,
    intent: Res<InputIntent>,
    mut q_player: Query<(&mut Velocity, &Body), With<Player>>,
) {
    let Ok((mut vel, body)) = q_player.single_mut() else {
        return;
    };

    vel.x = horizontal_speed(&intent, tunables.player_speed);

    if intent.jump && body.on_ground {
        vel.y = -tunables.jump_speed;
    }
}
