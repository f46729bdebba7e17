//! Level sessions.
//!
//! A session is everything spawned for one level: platforms, the player,
//! enemies, and whatever they create afterwards (projectiles, feedback). All of
//! it carries [`SessionEntity`]. A [`StartLevel`] message tears the current
//! session down and builds a fresh one, including score, combo, pending timers
//! and the session clock.

pub mod catalog;

use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::clock::SessionClock;
use crate::common::geometry::{Hitbox, Position, to_render};
use crate::common::sets::FrameSet;
use crate::common::state::{GameState, SessionEntity};
use crate::common::tunables::Tunables;
use crate::plugins::enemies::spawn_enemy;
use crate::plugins::input::InputIntent;
use crate::plugins::physics::Platform;
use crate::plugins::player::spawn_player;
use crate::plugins::scheduler::Scheduler;
use crate::plugins::scoring::Scoreboard;

pub use catalog::{LevelCatalog, LevelDef};

pub const PLATFORM_COLOR: Color = Color::srgb(0.420, 0.447, 0.502);

/// Ask for a level session. Unknown ids start level 1.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartLevel {
    pub id: u32,
}

/// How the game was launched.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    pub start_level: u32,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            start_level: catalog::FALLBACK_LEVEL,
        }
    }
}

/// The level the running session was built from.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Default)]
pub struct CurrentLevel {
    pub id: u32,
    pub name: String,
}

pub fn plugin(app: &mut App) {
    app.init_resource::<LevelCatalog>()
        .init_resource::<LaunchOptions>()
        .init_resource::<CurrentLevel>()
        .add_message::<StartLevel>()
        .add_systems(OnEnter(GameState::InGame), request_launch_level)
        .add_systems(Update, start_session.in_set(FrameSet::Session));
}

fn request_launch_level(options: Res<LaunchOptions>, mut start: MessageWriter<StartLevel>) {
    start.write(StartLevel {
        id: options.start_level,
    });
}

/// Rebuild the session for the most recent [`StartLevel`] of this frame.
pub fn start_session(
    mut commands: Commands,
    mut requests: MessageReader<StartLevel>,
    catalog: Res<LevelCatalog>,
    tunables: Res<Tunables>,
    mut current: ResMut<CurrentLevel>,
    mut clock: ResMut<SessionClock>,
    mut scheduler: ResMut<Scheduler>,
    mut board: ResMut<Scoreboard>,
    mut intent: ResMut<InputIntent>,
    q_session: Query<Entity, With<SessionEntity>>,
) {
    let Some(request) = requests.read().last().copied() else {
        return;
    };

    let level = catalog.get(request.id);
    if level.id != request.id {
        warn!(
            "unknown level {}; starting level {} instead",
            request.id, level.id
        );
    }

    for e in &q_session {
        commands.entity(e).despawn();
    }
    clock.reset();
    scheduler.clear();
    board.reset();
    *intent = InputIntent::default();

    spawn_level(&mut commands, level, &tunables);

    *current = CurrentLevel {
        id: level.id,
        name: level.name.clone(),
    };
    info!(
        "level {} \"{}\": {} platforms, {} enemies",
        level.id,
        level.name,
        level.platforms.len(),
        level.enemy_spawns.len()
    );
}

/// Spawn platforms, the player and enemies for `level`.
pub fn spawn_level(commands: &mut Commands, level: &LevelDef, tunables: &Tunables) {
    let world = tunables.world_size();

    for (i, platform) in level.platforms.iter().enumerate() {
        let size = platform.size();
        let at = platform.center();
        commands.spawn((
            Name::new(format!("Platform{i}")),
            Platform,
            Position(at),
            Hitbox::from_size(size),
            Sprite {
                color: PLATFORM_COLOR,
                custom_size: Some(size),
                ..default()
            },
            Transform::from_translation(to_render(at, world).extend(0.0)),
            SessionEntity,
            DespawnOnExit(GameState::InGame),
        ));
    }

    spawn_player(commands, level.player.into(), tunables);

    for (i, &at) in level.enemy_spawns.iter().enumerate() {
        spawn_enemy(commands, i, at.into(), tunables);
    }
}
