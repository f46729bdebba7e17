//! Test helpers.
//!
//! Systems that use `Commands` enqueue structural changes; `run_system_once`
//! flushes the world afterwards so queued commands land before assertions.

use std::time::Duration;

use bevy::ecs::message::{Message, MessageReader, Messages};
use bevy::ecs::system::{IntoSystem, RunSystemOnce};
use bevy::prelude::*;

use crate::common::clock::SessionClock;
use crate::common::tunables::Tunables;
use crate::plugins::audio::AudioOut;
use crate::plugins::feedback::FeedbackRng;
use crate::plugins::scheduler::{Scheduler, TimerFired};
use crate::plugins::scoring::{Popped, Scoreboard};

/// Run a system once on the given world, then flush deferred commands.
/// Returns the system output.
pub fn run_system_once<T, Out, Marker>(world: &mut World, system: T) -> Out
where
    T: IntoSystem<(), Out, Marker>,
{
    let out = world.run_system_once(system).expect("system run failed");
    world.flush();
    out
}

/// Everything currently buffered for message type `T`.
pub fn read_messages<T: Message + Clone>(world: &mut World) -> Vec<T> {
    run_system_once(world, |mut reader: MessageReader<T>| {
        reader.read().cloned().collect::<Vec<T>>()
    })
}

/// A bare world with the resources the gameplay systems read, clock at `now_ms`.
pub fn session_world(now_ms: u64) -> World {
    let mut world = World::new();
    let tunables = Tunables::default();

    let mut clock = SessionClock::default();
    clock.advance(Duration::from_millis(now_ms));

    world.insert_resource(FeedbackRng::seeded(tunables.feedback_seed));
    world.insert_resource(tunables);
    world.insert_resource(clock);
    world.init_resource::<Scheduler>();
    world.init_resource::<Scoreboard>();
    world.init_resource::<AudioOut>();
    world.init_resource::<Messages<TimerFired>>();
    world.init_resource::<Messages<Popped>>();
    world
}

/// Move the clock of a [`session_world`] to `now_ms`.
pub fn set_clock(world: &mut World, now_ms: u64) {
    let mut clock = world.resource_mut::<SessionClock>();
    clock.reset();
    clock.advance(Duration::from_millis(now_ms));
}
