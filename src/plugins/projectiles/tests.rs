use std::time::Duration;

use approx::assert_relative_eq;
use bevy::ecs::message::Messages;
use bevy::prelude::*;

use super::*;
use crate::common::test_utils::run_system_once;
use crate::plugins::audio::testing::RecordingSink;

fn world_with_player(vel_x: f32, shoot: bool) -> (World, RecordingSink) {
    let sink = RecordingSink::default();
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    world.insert_resource(SessionClock::default());
    world.insert_resource(Scheduler::default());
    world.insert_resource(AudioOut::with_sink(sink.clone()));
    world.insert_resource(InputIntent {
        shoot_edge: shoot,
        ..default()
    });
    world.spawn((
        Player,
        Position(Vec2::new(100.0, 520.0)),
        Velocity(Vec2::new(vel_x, 0.0)),
    ));
    (world, sink)
}

fn projectiles(world: &mut World) -> Vec<(Entity, Vec2, Vec2)> {
    world
        .query::<(Entity, &Projectile, &Position, &Velocity)>()
        .iter(world)
        .map(|(e, _, p, v)| (e, p.0, v.0))
        .collect()
}

#[test]
fn idle_shot_faces_right_from_above_the_player() {
    let (mut world, sink) = world_with_player(0.0, true);

    run_system_once(&mut world, fire_projectiles);

    let shots = projectiles(&mut world);
    assert_eq!(shots.len(), 1);
    let (_, pos, vel) = shots[0];
    assert_eq!(pos, Vec2::new(100.0, 510.0));
    assert_eq!(vel, Vec2::new(200.0, -120.0));
    assert_eq!(world.resource::<Scheduler>().len(), 1);
    assert_eq!(sink.frequencies(), vec![660.0]);
}

#[test]
fn moving_left_fires_left() {
    let (mut world, _) = world_with_player(-220.0, true);
    run_system_once(&mut world, fire_projectiles);
    assert_eq!(projectiles(&mut world)[0].2.x, -200.0);
}

#[test]
fn no_edge_no_shot() {
    let (mut world, sink) = world_with_player(0.0, false);
    run_system_once(&mut world, fire_projectiles);
    assert!(projectiles(&mut world).is_empty());
    assert!(sink.frequencies().is_empty());
}

#[test]
fn projectile_rises_linearly_and_drifts_sideways() {
    let tunables = Tunables::default();
    let p = Projectile {
        spawned_ms: 1000,
        origin_y: 510.0,
    };
    assert_relative_eq!(p.rise_y(1000, &tunables), 510.0);
    assert_relative_eq!(p.rise_y(1900, &tunables), 440.0);
    assert_relative_eq!(p.rise_y(2800, &tunables), 370.0);
    assert_relative_eq!(p.rise_y(9000, &tunables), 370.0);

    let mut world = World::new();
    world.insert_resource(tunables);
    let mut clock = SessionClock::default();
    clock.advance(Duration::from_millis(1900));
    world.insert_resource(clock);
    let e = world
        .spawn((p, Velocity(Vec2::new(200.0, -120.0)), Position(Vec2::new(100.0, 510.0))))
        .id();

    run_system_once(&mut world, advance_projectiles);

    let pos = world.get::<Position>(e).unwrap().0;
    // Step is clamped to 50 ms.
    assert_relative_eq!(pos.x, 110.0, epsilon = 1e-3);
    assert_relative_eq!(pos.y, 440.0);
}

#[test]
fn lifetime_timer_despawns_live_projectile_only() {
    let (mut world, _) = world_with_player(0.0, true);
    world.init_resource::<Messages<TimerFired>>();
    run_system_once(&mut world, fire_projectiles);
    let e = projectiles(&mut world)[0].0;

    // Before the lifetime is up nothing is due.
    {
        let mut scheduler = world.resource_mut::<Scheduler>();
        assert_eq!(scheduler.pop_due(1799), None);
        assert_eq!(scheduler.pop_due(1800), Some(ScheduledEvent::ExpireProjectile(e)));
    }

    world.write_message(TimerFired(ScheduledEvent::ExpireProjectile(e)));
    run_system_once(&mut world, expire_projectiles);
    assert!(world.get_entity(e).is_err());

    // Firing the same timer again for a gone entity does nothing.
    world.write_message(TimerFired(ScheduledEvent::ExpireProjectile(e)));
    run_system_once(&mut world, expire_projectiles);
    assert!(projectiles(&mut world).is_empty());
}
