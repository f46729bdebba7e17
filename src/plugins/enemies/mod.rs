//! Enemies plugin: patrol / trapped state machine.
//!
//! ```text
//!              projectile overlap
//!   Patrolling ──────────────────► Trapped { until }
//!       ▲                              │   │
//!       │  ReleaseTrap timer,          │   │ player overlap
//!       └── still alive and now ≥ until┘   ▼
//!                                     (despawned: popped)
//! ```
//!
//! - Patrolling: horizontal speed is `enemy_speed * direction`. The direction
//!   flips to +1 once x is left of the patrol band and to -1 once it is right
//!   of it, and nowhere else.
//! - Trapped: no gravity, drifts upward, no horizontal motion, tinted green.
//! - Popping is terminal for the entity and happens only from Trapped (see
//!   `plugins::collision`).
//!
//! The release timer is a [`ScheduledEvent::ReleaseTrap`] keyed by entity. A
//! popped enemy no longer matches the query, so its timer is a no-op; a timer
//! left over from an earlier trap is ignored because `until` is still ahead.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::clock::SessionClock;
use crate::common::geometry::{Hitbox, Position, Velocity, to_render};
use crate::common::sets::FrameSet;
use crate::common::state::{GameState, SessionEntity};
use crate::common::tunables::Tunables;
use crate::plugins::physics::Body;
use crate::plugins::scheduler::{ScheduledEvent, TimerFired, dispatch_timers};

pub const ENEMY_COLOR: Color = Color::srgb(0.937, 0.267, 0.267);
pub const TRAPPED_TINT: Color = Color::srgb(0.133, 0.773, 0.369);

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Enemy;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyState {
    Patrolling { direction: i8 },
    /// `resume_direction` is the patrol direction restored on release.
    Trapped { until_ms: u64, resume_direction: i8 },
}

impl EnemyState {
    #[inline]
    pub fn is_trapped(&self) -> bool {
        matches!(self, Self::Trapped { .. })
    }
}

/// Even spawn indices start walking left, odd ones right.
#[inline]
pub fn initial_direction(index: usize) -> i8 {
    if index % 2 == 0 { -1 } else { 1 }
}

pub fn plugin(app: &mut App) {
    app.add_systems(Update, patrol.in_set(FrameSet::Rules))
        .add_systems(
            Update,
            release_trapped
                .in_set(FrameSet::Timers)
                .after(dispatch_timers),
        );
}

pub fn spawn_enemy(commands: &mut Commands, index: usize, at: Vec2, tunables: &Tunables) -> Entity {
    let size = Vec2::splat(tunables.enemy_size);
    commands
        .spawn((
            Name::new(format!("Enemy{index}")),
            Enemy,
            EnemyState::Patrolling {
                direction: initial_direction(index),
            },
            Position(at),
            Velocity::default(),
            Hitbox::from_size(size),
            Body::enemy(tunables.enemy_bounce),
            Sprite {
                color: ENEMY_COLOR,
                custom_size: Some(size),
                ..default()
            },
            Transform::from_translation(to_render(at, tunables.world_size()).extend(1.0)),
            SessionEntity,
            DespawnOnExit(GameState::InGame),
        ))
        .id()
}

/// One patrol tick: returns the horizontal speed to use and the direction to
/// keep. Speed uses the direction held *before* the band check.
#[inline]
pub fn patrol_step(direction: i8, x: f32, tunables: &Tunables) -> (f32, i8) {
    let speed = tunables.enemy_speed * f32::from(direction);
    let next = if x < tunables.patrol_min_x {
        1
    } else if x > tunables.patrol_max_x {
        -1
    } else {
        direction
    };
    (speed, next)
}

pub fn patrol(
    tunables: Res<Tunables>,
    mut q: Query<(&mut EnemyState, &Position, &mut Velocity), With<Enemy>>,
) {
    for (mut state, pos, mut vel) in &mut q {
        match *state {
            EnemyState::Patrolling { direction } => {
                let (speed, next) = patrol_step(direction, pos.x, &tunables);
                vel.x = speed;
                if next != direction {
                    *state = EnemyState::Patrolling { direction: next };
                }
            }
            EnemyState::Trapped { .. } => vel.x = 0.0,
        }
    }
}

/// Patrolling -> Trapped. Returns `false` (and changes nothing) if the enemy
/// is already trapped.
pub fn trap(
    now_ms: u64,
    tunables: &Tunables,
    state: &mut EnemyState,
    vel: &mut Velocity,
    body: &mut Body,
    sprite: &mut Sprite,
) -> bool {
    let EnemyState::Patrolling { direction } = *state else {
        return false;
    };

    *state = EnemyState::Trapped {
        until_ms: now_ms + tunables.trapped_duration_ms,
        resume_direction: direction,
    };
    vel.0 = Vec2::new(0.0, -tunables.trapped_rise_speed);
    body.gravity = false;
    sprite.color = TRAPPED_TINT;
    true
}

/// Trapped -> Patrolling once the release timer fires.
pub fn release_trapped(
    clock: Res<SessionClock>,
    mut fired: MessageReader<TimerFired>,
    mut q: Query<(&mut EnemyState, &mut Body, &mut Sprite), With<Enemy>>,
) {
    let now = clock.now_ms();

    for TimerFired(event) in fired.read() {
        let ScheduledEvent::ReleaseTrap(e) = *event else {
            continue;
        };

        let Ok((mut state, mut body, mut sprite)) = q.get_mut(e) else {
            debug!("release timer for {e:?} ignored: enemy is gone");
            continue;
        };

        let EnemyState::Trapped {
            until_ms,
            resume_direction,
        } = *state
        else {
            continue;
        };
        if now < until_ms {
            continue;
        }

        *state = EnemyState::Patrolling {
            direction: resume_direction,
        };
        body.gravity = true;
        sprite.color = ENEMY_COLOR;
        debug!("enemy {e:?} escaped");
    }
}
