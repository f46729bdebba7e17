//! Overlap rules between bodies.
//!
//! Two rules run every frame, in this order, after movement:
//!
//! 1. Projectile x Enemy: the projectile is consumed by the first enemy it
//!    overlaps. A patrolling enemy becomes trapped; a trapped one is left
//!    alone.
//! 2. Player x Enemy: a trapped enemy under the player is popped (a
//!    [`Popped`] message for scoring) and despawned. Patrolling enemies are
//!    harmless.
//!
//! An enemy trapped by rule 1 can be popped by rule 2 in the same frame.

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::common::clock::SessionClock;
use crate::common::geometry::{Aabb, Hitbox, Position, Velocity};
use crate::common::sets::FrameSet;
use crate::common::tunables::Tunables;
use crate::plugins::audio::{AudioOut, Tone};
use crate::plugins::enemies::{self, Enemy, EnemyState};
use crate::plugins::physics::Body;
use crate::plugins::player::Player;
use crate::plugins::projectiles::Projectile;
use crate::plugins::scheduler::{ScheduledEvent, Scheduler};
use crate::plugins::scoring::Popped;

pub fn plugin(app: &mut App) {
    app.add_systems(Update, resolve_overlaps.in_set(FrameSet::Overlap));
}

/// First entity in `others` whose box overlaps `target`.
#[inline]
pub fn first_overlap(target: &Aabb, others: &[(Entity, Aabb)]) -> Option<Entity> {
    others
        .iter()
        .find(|(_, other)| target.overlaps(other))
        .map(|(e, _)| *e)
}

pub fn resolve_overlaps(
    mut commands: Commands,
    clock: Res<SessionClock>,
    tunables: Res<Tunables>,
    mut scheduler: ResMut<Scheduler>,
    mut audio: ResMut<AudioOut>,
    mut popped: MessageWriter<Popped>,
    q_projectiles: Query<(Entity, &Position, &Hitbox), With<Projectile>>,
    q_player: Query<(&Position, &Hitbox), With<Player>>,
    mut q_enemies: Query<
        (
            Entity,
            &Position,
            &Hitbox,
            &mut EnemyState,
            &mut Velocity,
            &mut Body,
            &mut Sprite,
        ),
        With<Enemy>,
    >,
) {
    let now = clock.now_ms();

    let mut targets: Vec<(Entity, Aabb)> = q_enemies
        .iter()
        .map(|(e, pos, hitbox, ..)| (e, hitbox.at(pos.0)))
        .collect();
    targets.sort_by_key(|(e, _)| *e);

    // Rule 1
    for (projectile, pos, hitbox) in &q_projectiles {
        let Some(hit) = first_overlap(&hitbox.at(pos.0), &targets) else {
            continue;
        };
        commands.entity(projectile).despawn();

        let Ok((_, _, _, mut state, mut vel, mut body, mut sprite)) = q_enemies.get_mut(hit) else {
            continue;
        };
        if enemies::trap(now, &tunables, &mut state, &mut vel, &mut body, &mut sprite) {
            scheduler.schedule(
                now,
                tunables.trapped_duration_ms,
                ScheduledEvent::ReleaseTrap(hit),
            );
            audio.play(Tone::trap());
            debug!("enemy {hit:?} trapped by {projectile:?}");
        }
    }

    // Rule 2
    let Ok((player_pos, player_hitbox)) = q_player.single() else {
        return;
    };
    let player_box = player_hitbox.at(player_pos.0);

    for (enemy, pos, hitbox, state, ..) in &q_enemies {
        if !state.is_trapped() || !player_box.overlaps(&hitbox.at(pos.0)) {
            continue;
        }
        popped.write(Popped { enemy, at: pos.0 });
        commands.entity(enemy).despawn();
        debug!("enemy {enemy:?} popped at {:?}", pos.0);
    }
}
