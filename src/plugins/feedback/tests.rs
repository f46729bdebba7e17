use std::sync::{Arc, Mutex};

use approx::assert_relative_eq;
use bevy::prelude::*;

use super::*;
use super::Display;
use crate::common::test_utils::{run_system_once, session_world, set_clock};

#[derive(Clone, Default)]
struct Labels(Arc<Mutex<Vec<String>>>);

impl DisplaySink for Labels {
    fn set_score_text(&mut self, text: &str) {
        self.0.lock().unwrap().push(text.to_string());
    }

    fn set_combo_text(&mut self, text: &str) {
        self.0.lock().unwrap().push(text.to_string());
    }
}

fn spawn_text(world: &mut World, now_ms: u64, at: Vec2) -> Entity {
    run_system_once(
        world,
        move |mut commands: Commands, mut scheduler: ResMut<Scheduler>, tunables: Res<Tunables>| {
            spawn_floating_text(&mut commands, &mut scheduler, &tunables, now_ms, at, "+100".into())
        },
    )
}

fn spawn_particles(world: &mut World, now_ms: u64, at: Vec2) -> Vec<Entity> {
    run_system_once(
        world,
        move |mut commands: Commands,
              mut scheduler: ResMut<Scheduler>,
              mut rng: ResMut<FeedbackRng>,
              tunables: Res<Tunables>| {
            spawn_burst(&mut commands, &mut scheduler, &mut rng, &tunables, now_ms, at)
        },
    )
}

#[test]
fn floating_text_rises_and_fades() {
    let mut world = session_world(0);
    let at = Vec2::new(200.0, 300.0);
    let e = spawn_text(&mut world, 0, at);

    set_clock(&mut world, 400);
    run_system_once(&mut world, animate_floating_text);
    assert_relative_eq!(world.get::<Position>(e).unwrap().y, 285.0);
    assert_relative_eq!(world.get::<FloatingText>(e).unwrap().alpha, 0.5);

    set_clock(&mut world, 2000);
    run_system_once(&mut world, animate_floating_text);
    assert_relative_eq!(world.get::<Position>(e).unwrap().y, 270.0);
    assert_relative_eq!(world.get::<FloatingText>(e).unwrap().alpha, 0.0);
}

#[test]
fn burst_is_bounded_and_shrinks() {
    let mut world = session_world(0);
    let at = Vec2::new(400.0, 300.0);
    let particles = spawn_particles(&mut world, 0, at);
    assert_eq!(particles.len(), 20);
    assert_eq!(world.resource::<Scheduler>().len(), 20);

    for &p in &particles {
        let v = world.get::<Particle>(p).unwrap().velocity;
        assert!(v.x.abs() <= 120.0 && v.y.abs() <= 120.0);
    }

    set_clock(&mut world, 200);
    run_system_once(&mut world, animate_particles);
    for &p in &particles {
        let particle = *world.get::<Particle>(p).unwrap();
        assert_relative_eq!(particle.scale, 0.3);
        let pos = world.get::<Position>(p).unwrap().0;
        assert_relative_eq!(pos.x, at.x + particle.velocity.x * 0.2, epsilon = 1e-3);
    }
}

#[test]
fn seeded_bursts_repeat() {
    let velocities = |world: &mut World| {
        let ps = spawn_particles(world, 0, Vec2::ZERO);
        ps.iter()
            .map(|&p| world.get::<Particle>(p).unwrap().velocity)
            .collect::<Vec<_>>()
    };
    let mut a = session_world(0);
    let mut b = session_world(0);
    assert_eq!(velocities(&mut a), velocities(&mut b));
}

#[test]
fn expiry_despawns_only_live_feedback() {
    let mut world = session_world(0);
    let text = spawn_text(&mut world, 0, Vec2::ZERO);
    let other = world.spawn_empty().id();

    world.write_message(TimerFired(ScheduledEvent::ExpireFeedback(text)));
    world.write_message(TimerFired(ScheduledEvent::ExpireFeedback(other)));
    run_system_once(&mut world, expire_feedback);

    assert!(world.get_entity(text).is_err());
    // Not a feedback entity: left alone.
    assert!(world.get_entity(other).is_ok());

    // A second expiry for the same entity is a no-op.
    world.write_message(TimerFired(ScheduledEvent::ExpireFeedback(text)));
    run_system_once(&mut world, expire_feedback);
}

#[test]
fn display_refreshes_on_revision_change() {
    let mut world = World::new();
    let labels = Labels::default();
    world.insert_resource(Display::default().with_sink(labels.clone()));
    world.init_resource::<Scoreboard>();

    let mut schedule = Schedule::default();
    schedule.add_systems(refresh_display);

    schedule.run(&mut world);
    schedule.run(&mut world);
    assert_eq!(*labels.0.lock().unwrap(), vec!["Score: 0", "Combo x1"]);

    world
        .resource_mut::<Scoreboard>()
        .register_pop(0, &Default::default());
    schedule.run(&mut world);
    assert_eq!(labels.0.lock().unwrap()[2..], ["Score: 100", "Combo x1"]);
}
