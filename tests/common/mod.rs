//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides core ECS runtime.
//! - we then call `bubble_trap::game::configure_headless` to install gameplay plugins.
//! - time advances by a fixed step per `app.update()`.

#![allow(dead_code)]

use std::time::Duration;

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

use bubble_trap::common::clock::SessionClock;
use bubble_trap::common::geometry::{Hitbox, Position, Velocity};
use bubble_trap::game::GameSetup;
use bubble_trap::plugins::enemies::Enemy;
use bubble_trap::plugins::player::Player;
use bubble_trap::plugins::projectiles::Projectile;

pub const STEP_MS: u64 = 50;

pub fn app_headless() -> App {
    app_with(GameSetup::default())
}

pub fn app_with(setup: GameSetup) -> App {
    let mut app = App::new();

    // Add AssetPlugin + ScenePlugin so SceneSpawner exists.
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(
        STEP_MS,
    )));

    setup.install(&mut app);
    bubble_trap::game::configure_headless(&mut app);
    app
}

pub fn step(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

/// Run frames until the session clock reaches `ms`.
pub fn run_until(app: &mut App, ms: u64) {
    while now_ms(app) < ms {
        app.update();
    }
}

pub fn now_ms(app: &App) -> u64 {
    app.world().resource::<SessionClock>().now_ms()
}

pub fn enemies(app: &mut App) -> Vec<Entity> {
    let mut out: Vec<Entity> = app
        .world_mut()
        .query_filtered::<Entity, With<Enemy>>()
        .iter(app.world())
        .collect();
    out.sort();
    out
}

pub fn player(app: &mut App) -> Entity {
    app.world_mut()
        .query_filtered::<Entity, With<Player>>()
        .single(app.world())
        .expect("one player")
}

pub fn position(app: &App, e: Entity) -> Vec2 {
    app.world().get::<Position>(e).expect("has position").0
}

/// Drop a resting projectile right on top of `target`.
pub fn bubble_on(app: &mut App, target: Entity) -> Entity {
    let at = position(app, target);
    let now = now_ms(app);
    app.world_mut()
        .spawn((
            Projectile {
                spawned_ms: now,
                origin_y: at.y,
            },
            Position(at),
            Velocity::default(),
            Hitbox::from_size(Vec2::splat(16.0)),
        ))
        .id()
}

/// Park the player inside `target`'s box.
pub fn player_onto(app: &mut App, target: Entity) {
    let at = position(app, target);
    let p = player(app);
    app.world_mut().entity_mut(p).insert((Position(at), Velocity::default()));
}

pub fn is_alive(app: &App, e: Entity) -> bool {
    app.world().get_entity(e).is_ok()
}
