//! Scoring plugin: pops -> score, combo multiplier, feedback.
//!
//! The combo rule itself lives in [`combo`] as a pure function of
//! (multiplier, last pop time, now). This module owns the only copy of that
//! state ([`Scoreboard`]) and turns each [`Popped`] message into score plus the
//! feedback the pop asks for: floating "+N", a particle burst, the pop tone and,
//! when the combo continues, a three-note arpeggio on the scheduler.

pub mod combo;

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::common::clock::SessionClock;
use crate::common::sets::FrameSet;
use crate::common::tunables::Tunables;
use crate::plugins::audio::{AudioOut, Tone};
use crate::plugins::feedback::{self, FeedbackRng};
use crate::plugins::scheduler::{ScheduledEvent, Scheduler};

use combo::{ComboRules, ComboState, PopFeedback, PopOutcome};

/// A trapped enemy was popped at `at` (level space).
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct Popped {
    pub enemy: Entity,
    pub at: Vec2,
}

/// Score and combo for the running session.
///
/// `revision` changes on every write (including resets) so display sinks can
/// tell when to refresh; it never goes back to an earlier value.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct Scoreboard {
    score: u64,
    combo: ComboState,
    revision: u64,
}

impl Scoreboard {
    #[inline]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[inline]
    pub fn multiplier(&self) -> u8 {
        self.combo.multiplier()
    }

    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn reset(&mut self) {
        self.score = 0;
        self.combo = ComboState::default();
        self.revision += 1;
    }

    pub fn register_pop(&mut self, now_ms: u64, rules: &ComboRules) -> PopOutcome {
        let (combo, outcome) = self.combo.on_pop(now_ms, rules);
        self.combo = combo;
        self.score += outcome.gained;
        self.revision += 1;
        outcome
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<Scoreboard>()
        .add_message::<Popped>()
        .add_systems(Update, score_pops.in_set(FrameSet::Rules));
}

pub fn score_pops(
    mut commands: Commands,
    mut popped: MessageReader<Popped>,
    tunables: Res<Tunables>,
    clock: Res<SessionClock>,
    mut board: ResMut<Scoreboard>,
    mut scheduler: ResMut<Scheduler>,
    mut audio: ResMut<AudioOut>,
    mut rng: ResMut<FeedbackRng>,
) {
    let now = clock.now_ms();
    let rules = ComboRules::from_tunables(&tunables);

    for pop in popped.read() {
        let outcome = board.register_pop(now, &rules);
        debug!(
            "pop at {:?}: x{} (+{}), score {}",
            pop.at,
            outcome.multiplier,
            outcome.gained,
            board.score()
        );

        for fb in outcome.feedback(pop.at) {
            match fb {
                PopFeedback::FloatingText { text, at } => {
                    feedback::spawn_floating_text(
                        &mut commands,
                        &mut scheduler,
                        &tunables,
                        now,
                        at,
                        text,
                    );
                }
                PopFeedback::ParticleBurst { at } => {
                    feedback::spawn_burst(
                        &mut commands,
                        &mut scheduler,
                        &mut rng,
                        &tunables,
                        now,
                        at,
                    );
                }
                PopFeedback::PopTone { multiplier } => audio.play(Tone::pop(multiplier)),
                PopFeedback::ComboNote {
                    index,
                    delay_ms,
                    multiplier,
                } => scheduler.schedule(now, delay_ms, ScheduledEvent::ComboNote { index, multiplier }),
            }
        }
    }
}
