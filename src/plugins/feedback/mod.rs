//! Feedback plugin: floating score text, particle bursts, and the score/combo
//! display sinks.
//!
//! Presentation is derived from facts. Floating text and particles carry their
//! spawn time and are animated from the session clock; their removal is a
//! scheduled `ExpireFeedback`. The display sinks see `Scoreboard` after every
//! change and nothing else.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::common::clock::SessionClock;
use crate::common::geometry::{Position, to_render};
use crate::common::sets::FrameSet;
use crate::common::state::{GameState, SessionEntity};
use crate::common::tunables::Tunables;
use crate::plugins::scheduler::{ScheduledEvent, Scheduler, TimerFired, dispatch_timers};
use crate::plugins::scoring::Scoreboard;
use crate::plugins::scoring::combo::{combo_text, score_text};

const PARTICLE_SIZE: f32 = 6.0;

/// "+N" rising and fading above a pop.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct FloatingText {
    pub text: String,
    pub origin: Vec2,
    pub spawned_ms: u64,
    pub alpha: f32,
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub origin: Vec2,
    pub velocity: Vec2,
    pub spawned_ms: u64,
    pub scale: f32,
}

#[derive(Resource, Debug, Deref, DerefMut)]
pub struct FeedbackRng(pub ChaCha8Rng);

impl FeedbackRng {
    pub fn seeded(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

/// Write-only sink for the score and combo labels.
pub trait DisplaySink: Send + Sync {
    fn set_score_text(&mut self, text: &str);
    fn set_combo_text(&mut self, text: &str);
}

/// Installed display sinks. Empty is fine: the simulation never reads back.
#[derive(Resource, Default)]
pub struct Display {
    sinks: Vec<Box<dyn DisplaySink>>,
}

impl Display {
    pub fn with_sink(mut self, sink: impl DisplaySink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn add_sink(&mut self, sink: impl DisplaySink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    fn show(&mut self, board: &Scoreboard) {
        let score = score_text(board.score());
        let combo = combo_text(board.multiplier());
        for sink in &mut self.sinks {
            sink.set_score_text(&score);
            sink.set_combo_text(&combo);
        }
    }
}

/// Sink that reports label changes to the log.
#[derive(Debug, Default)]
pub struct LogDisplay;

impl DisplaySink for LogDisplay {
    fn set_score_text(&mut self, text: &str) {
        info!("{text}");
    }

    fn set_combo_text(&mut self, text: &str) {
        debug!("{text}");
    }
}

pub fn plugin(app: &mut App) {
    let seed = app
        .world()
        .get_resource::<Tunables>()
        .map_or_else(|| Tunables::default().feedback_seed, |t| t.feedback_seed);
    app.insert_resource(FeedbackRng::seeded(seed))
        .init_resource::<Display>()
        .add_systems(
            Update,
            (animate_floating_text, animate_particles, refresh_display).in_set(FrameSet::Feedback),
        )
        .add_systems(
            Update,
            expire_feedback
                .in_set(FrameSet::Timers)
                .after(dispatch_timers),
        );
}

pub fn spawn_floating_text(
    commands: &mut Commands,
    scheduler: &mut Scheduler,
    tunables: &Tunables,
    now_ms: u64,
    at: Vec2,
    text: String,
) -> Entity {
    let e = commands
        .spawn((
            Name::new("FloatingText"),
            FloatingText {
                text,
                origin: at,
                spawned_ms: now_ms,
                alpha: 1.0,
            },
            Position(at),
            Transform::from_translation(to_render(at, tunables.world_size()).extend(5.0)),
            SessionEntity,
            DespawnOnExit(GameState::InGame),
        ))
        .id();
    scheduler.schedule(now_ms, tunables.floating_text_ms, ScheduledEvent::ExpireFeedback(e));
    e
}

pub fn spawn_burst(
    commands: &mut Commands,
    scheduler: &mut Scheduler,
    rng: &mut FeedbackRng,
    tunables: &Tunables,
    now_ms: u64,
    at: Vec2,
) -> Vec<Entity> {
    let speed = tunables.particle_speed;
    let translation = to_render(at, tunables.world_size()).extend(4.0);

    (0..tunables.particle_count)
        .map(|_| {
            let velocity = Vec2::new(
                rng.0.gen_range(-speed..=speed),
                rng.0.gen_range(-speed..=speed),
            );
            let e = commands
                .spawn((
                    Name::new("Particle"),
                    Particle {
                        origin: at,
                        velocity,
                        spawned_ms: now_ms,
                        scale: tunables.particle_scale,
                    },
                    Position(at),
                    Sprite::from_color(Color::WHITE, Vec2::splat(PARTICLE_SIZE)),
                    Transform::from_translation(translation)
                        .with_scale(Vec3::splat(tunables.particle_scale)),
                    SessionEntity,
                    DespawnOnExit(GameState::InGame),
                ))
                .id();
            scheduler.schedule(now_ms, tunables.particle_lifespan_ms, ScheduledEvent::ExpireFeedback(e));
            e
        })
        .collect()
}

#[inline]
fn progress(now_ms: u64, spawned_ms: u64, duration_ms: u64) -> f32 {
    let age = now_ms.saturating_sub(spawned_ms) as f32;
    (age / duration_ms.max(1) as f32).clamp(0.0, 1.0)
}

pub fn animate_floating_text(
    clock: Res<SessionClock>,
    tunables: Res<Tunables>,
    mut q: Query<(&mut FloatingText, &mut Position), Without<Particle>>,
) {
    let now = clock.now_ms();
    for (mut text, mut pos) in &mut q {
        let t = progress(now, text.spawned_ms, tunables.floating_text_ms);
        pos.y = text.origin.y - tunables.floating_text_rise * t;
        text.alpha = 1.0 - t;
    }
}

pub fn animate_particles(
    clock: Res<SessionClock>,
    tunables: Res<Tunables>,
    mut q: Query<(&mut Particle, &mut Position, &mut Transform, &mut Sprite), Without<FloatingText>>,
) {
    let now = clock.now_ms();
    for (mut particle, mut pos, mut tf, mut sprite) in &mut q {
        let age_secs = now.saturating_sub(particle.spawned_ms) as f32 / 1000.0;
        let t = progress(now, particle.spawned_ms, tunables.particle_lifespan_ms);

        pos.0 = particle.origin + particle.velocity * age_secs;
        particle.scale = tunables.particle_scale * (1.0 - t);
        tf.scale = Vec3::splat(particle.scale);

        let mut c = sprite.color.to_srgba();
        c.alpha = 1.0 - t;
        sprite.color = c.into();
    }
}

pub fn expire_feedback(
    mut commands: Commands,
    mut fired: MessageReader<TimerFired>,
    q: Query<(), Or<(With<FloatingText>, With<Particle>)>>,
) {
    for TimerFired(event) in fired.read() {
        let ScheduledEvent::ExpireFeedback(e) = *event else {
            continue;
        };
        if q.contains(e) {
            commands.entity(e).despawn();
        }
    }
}

/// Push the labels to every sink whenever the scoreboard changed.
pub fn refresh_display(
    board: Res<Scoreboard>,
    mut display: ResMut<Display>,
    mut shown: Local<Option<u64>>,
) {
    if *shown == Some(board.revision()) {
        return;
    }
    display.show(&board);
    *shown = Some(board.revision());
}

#[cfg(test)]
mod tests;
