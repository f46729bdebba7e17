//! Projectiles plugin: trapping bubbles fired by the player.
//!
//! # Lifecycle
//! ```text
//! Control:  shoot_edge ──► fire_projectiles ──► spawn + schedule ExpireProjectile
//! Movement: advance_projectiles (x from velocity, y from the rise)
//! Overlap:  first enemy overlap despawns it (plugins::collision)
//! Timers:   expire_projectiles despawns it if it is still alive
//! ```
//!
//! Projectiles ignore gravity and platforms. Horizontal motion integrates the
//! launch velocity; the vertical coordinate follows a linear rise of
//! `projectile_rise_distance` over the lifetime, which always wins over the
//! stored vertical velocity. Expiry has no score or state side effects.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::clock::SessionClock;
use crate::common::geometry::{Hitbox, Position, Velocity, to_render};
use crate::common::sets::FrameSet;
use crate::common::state::{GameState, SessionEntity};
use crate::common::tunables::Tunables;
use crate::plugins::audio::{AudioOut, Tone};
use crate::plugins::input::InputIntent;
use crate::plugins::player::{self, Player};
use crate::plugins::scheduler::{ScheduledEvent, Scheduler, TimerFired, dispatch_timers};

const PROJECTILE_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.85);

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub spawned_ms: u64,
    pub origin_y: f32,
}

impl Projectile {
    /// Vertical position `now_ms` into the flight.
    pub fn rise_y(&self, now_ms: u64, tunables: &Tunables) -> f32 {
        let age = now_ms.saturating_sub(self.spawned_ms) as f32;
        let life = tunables.projectile_lifetime_ms.max(1) as f32;
        let t = (age / life).min(1.0);
        self.origin_y - tunables.projectile_rise_distance * t
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        fire_projectiles
            .in_set(FrameSet::Control)
            .after(player::apply_intent),
    )
    .add_systems(Update, advance_projectiles.in_set(FrameSet::Movement))
    .add_systems(
        Update,
        expire_projectiles
            .in_set(FrameSet::Timers)
            .after(dispatch_timers),
    );
}

/// Facing is the sign of the player's horizontal velocity; at rest it is +1.
#[inline]
pub fn facing(vel_x: f32) -> f32 {
    if vel_x >= 0.0 { 1.0 } else { -1.0 }
}

pub fn fire_projectiles(
    mut commands: Commands,
    intent: Res<InputIntent>,
    tunables: Res<Tunables>,
    clock: Res<SessionClock>,
    mut scheduler: ResMut<Scheduler>,
    mut audio: ResMut<AudioOut>,
    q_player: Query<(&Position, &Velocity), With<Player>>,
) {
    if !intent.shoot_edge {
        return;
    }
    let Ok((pos, vel)) = q_player.single() else {
        return;
    };

    let now = clock.now_ms();
    let at = Vec2::new(pos.x, pos.y - tunables.projectile_spawn_lift);
    let velocity = Vec2::new(
        tunables.projectile_speed * facing(vel.x),
        -tunables.projectile_rise_speed,
    );
    let size = Vec2::splat(tunables.projectile_size);

    let e = commands
        .spawn((
            Name::new("Projectile"),
            Projectile {
                spawned_ms: now,
                origin_y: at.y,
            },
            Position(at),
            Velocity(velocity),
            Hitbox::from_size(size),
            Sprite {
                color: PROJECTILE_COLOR,
                custom_size: Some(size),
                ..default()
            },
            Transform::from_translation(to_render(at, tunables.world_size()).extend(2.0)),
            SessionEntity,
            DespawnOnExit(GameState::InGame),
        ))
        .id();

    scheduler.schedule(
        now,
        tunables.projectile_lifetime_ms,
        ScheduledEvent::ExpireProjectile(e),
    );
    audio.play(Tone::shoot());
}

pub fn advance_projectiles(
    clock: Res<SessionClock>,
    tunables: Res<Tunables>,
    mut q: Query<(&Projectile, &Velocity, &mut Position)>,
) {
    let dt = clock.step_secs();
    let now = clock.now_ms();
    for (projectile, vel, mut pos) in &mut q {
        pos.x += vel.x * dt;
        pos.y = projectile.rise_y(now, &tunables);
    }
}

/// Lifetime over: despawn unless an overlap already consumed it.
pub fn expire_projectiles(
    mut commands: Commands,
    mut fired: MessageReader<TimerFired>,
    q: Query<(), With<Projectile>>,
) {
    for TimerFired(event) in fired.read() {
        let ScheduledEvent::ExpireProjectile(e) = *event else {
            continue;
        };
        if q.contains(e) {
            commands.entity(e).despawn();
        }
    }
}

#[cfg(test)]
mod tests;
