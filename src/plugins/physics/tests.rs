use std::time::Duration;

use approx::assert_relative_eq;
use bevy::prelude::*;

use super::*;
use crate::common::test_utils::run_system_once;

const DT: f32 = 1.0 / 60.0;

fn params() -> StepParams {
    StepParams {
        gravity: 800.0,
        world: Vec2::new(800.0, 600.0),
        dt: DT,
    }
}

/// The wide floor of every built-in level: 800x32 centred at (400, 580).
fn floor() -> Aabb {
    Aabb::from_center(Vec2::new(400.0, 580.0), Vec2::new(400.0, 16.0))
}

fn player_hitbox() -> Hitbox {
    Hitbox::from_size(Vec2::new(24.0, 28.0))
}

#[test]
fn falling_body_lands_on_platform_top() {
    let hitbox = player_hitbox();
    let mut body = Body::player();
    let mut pos = Vec2::new(100.0, 500.0);
    let mut vel = Vec2::ZERO;

    for _ in 0..120 {
        step_body(&mut pos, &mut vel, &hitbox, &mut body, &[floor()], params());
    }

    // Floor top is at 564; hitbox half height 14.
    assert_relative_eq!(pos.y, 550.0);
    assert_eq!(vel.y, 0.0);
    assert!(body.on_ground);
}

#[test]
fn gravity_only_applies_when_enabled() {
    let hitbox = Hitbox::from_size(Vec2::splat(32.0));
    let mut body = Body::enemy(0.1);
    body.gravity = false;
    let mut pos = Vec2::new(300.0, 300.0);
    let mut vel = Vec2::new(0.0, -50.0);

    step_body(&mut pos, &mut vel, &hitbox, &mut body, &[], params());

    assert_relative_eq!(vel.y, -50.0);
    assert_relative_eq!(pos.y, 300.0 - 50.0 * DT, epsilon = 1e-4);
    assert!(!body.on_ground);
}

#[test]
fn horizontal_motion_stops_at_platform_edge() {
    let wall = Aabb::from_center(Vec2::new(200.0, 400.0), Vec2::new(32.0, 8.0));
    let hitbox = player_hitbox();
    let mut body = Body::player();
    body.gravity = false;
    // Right edge of the hitbox sits 2 units left of the wall.
    let mut pos = Vec2::new(200.0 - 32.0 - 12.0 - 2.0, 400.0);
    let mut vel = Vec2::new(220.0, 0.0);

    step_body(&mut pos, &mut vel, &hitbox, &mut body, &[wall], params());

    assert_relative_eq!(pos.x, 200.0 - 32.0 - 12.0);
    assert_eq!(vel.x, 0.0);
}

#[test]
fn rising_body_stops_under_platform() {
    let ceiling = Aabb::from_center(Vec2::new(150.0, 420.0), Vec2::new(32.0, 8.0));
    let hitbox = player_hitbox();
    let mut body = Body::player();
    let mut pos = Vec2::new(150.0, 428.0 + 14.0 + 1.0);
    let mut vel = Vec2::new(0.0, -420.0);

    step_body(&mut pos, &mut vel, &hitbox, &mut body, &[ceiling], params());

    assert_relative_eq!(pos.y, 428.0 + 14.0);
    assert!(!body.on_ground);
    assert_eq!(vel.y, 0.0);
}

#[test]
fn hard_landing_bounces_then_settles() {
    let hitbox = Hitbox::from_size(Vec2::splat(32.0));
    let mut body = Body::enemy(0.1);
    let mut pos = Vec2::new(600.0, 546.0);
    let mut vel = Vec2::new(0.0, 600.0);

    step_body(&mut pos, &mut vel, &hitbox, &mut body, &[floor()], params());
    assert!(body.on_ground);
    assert!(vel.y < 0.0, "expected a small rebound, got {}", vel.y);
    assert_relative_eq!(vel.y, -(600.0 + 800.0 * DT) * 0.1, epsilon = 1e-3);

    for _ in 0..60 {
        step_body(&mut pos, &mut vel, &hitbox, &mut body, &[floor()], params());
    }
    assert_relative_eq!(pos.y, 548.0);
    assert_eq!(vel.y, 0.0);
}

#[test]
fn world_bounds_clamp_and_floor_grounds() {
    let hitbox = player_hitbox();
    let mut body = Body::player();
    let mut pos = Vec2::new(5.0, 598.0);
    let mut vel = Vec2::new(-220.0, 100.0);

    step_body(&mut pos, &mut vel, &hitbox, &mut body, &[], params());

    assert_relative_eq!(pos.x, 12.0);
    assert_relative_eq!(pos.y, 586.0);
    assert!(body.on_ground);
}

#[test]
fn weightless_body_drifts_back_from_world_ceiling() {
    let hitbox = Hitbox::from_size(Vec2::splat(32.0));
    let mut body = Body::enemy(0.1);
    body.gravity = false;
    let mut pos = Vec2::new(400.0, 16.5);
    let mut vel = Vec2::new(0.0, -50.0);

    step_body(&mut pos, &mut vel, &hitbox, &mut body, &[], params());
    assert_relative_eq!(pos.y, 16.0);
    assert_relative_eq!(vel.y, 5.0);

    for _ in 0..10 {
        step_body(&mut pos, &mut vel, &hitbox, &mut body, &[], params());
    }
    assert_relative_eq!(vel.y, 5.0);
    assert_relative_eq!(pos.y, 16.0 + 10.0 * 5.0 * DT, epsilon = 1e-4);
}

#[test]
fn trapped_enemy_is_not_pinned_under_platform() {
    // Underside of a 64x16 block at y = 360 is 368.
    let block = Aabb::from_center(Vec2::new(650.0, 360.0), Vec2::new(32.0, 8.0));
    let hitbox = Hitbox::from_size(Vec2::splat(32.0));
    let mut body = Body::enemy(0.1);
    body.gravity = false;
    let mut pos = Vec2::new(650.0, 368.0 + 16.0 + 0.5);
    let mut vel = Vec2::new(0.0, -50.0);

    step_body(&mut pos, &mut vel, &hitbox, &mut body, &[block], params());
    assert_relative_eq!(pos.y, 368.0 + 16.0);
    assert_relative_eq!(vel.y, 5.0);

    step_body(&mut pos, &mut vel, &hitbox, &mut body, &[block], params());
    assert!(pos.y > 368.0 + 16.0, "expected a slow drift down, y = {}", pos.y);
}

#[test]
fn weak_rebound_still_settles_under_gravity() {
    let hitbox = Hitbox::from_size(Vec2::splat(32.0));
    let mut body = Body::enemy(0.1);
    let mut pos = Vec2::new(600.0, 547.0);
    let mut vel = Vec2::new(0.0, 100.0);

    step_body(&mut pos, &mut vel, &hitbox, &mut body, &[floor()], params());

    assert_eq!(vel.y, 0.0);
    assert!(body.on_ground);
}

#[test]
fn integrate_bodies_skips_platforms_and_uses_clock() {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    let mut clock = SessionClock::default();
    clock.advance(Duration::from_millis(16));
    world.insert_resource(clock);

    let platform = world
        .spawn((
            Platform,
            Position(Vec2::new(400.0, 580.0)),
            Hitbox::from_size(Vec2::new(800.0, 32.0)),
        ))
        .id();
    let player = world
        .spawn((
            Position(Vec2::new(100.0, 300.0)),
            Velocity(Vec2::new(220.0, 0.0)),
            player_hitbox(),
            Body::player(),
        ))
        .id();

    run_system_once(&mut world, integrate_bodies);

    let p = world.get::<Position>(player).unwrap();
    assert_relative_eq!(p.x, 100.0 + 220.0 * 0.016, epsilon = 1e-3);
    assert!(p.y > 300.0);
    assert_eq!(world.get::<Position>(platform).unwrap().0, Vec2::new(400.0, 580.0));
}
