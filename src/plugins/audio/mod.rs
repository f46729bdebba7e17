//! Audio feedback: short synthesized tones instead of sample playback.
//!
//! The output context is injected as a [`ToneSink`]. With no sink installed
//! every `play` is a silent no-op; audio can never fail a frame.

pub mod live;
pub mod synth;
pub mod wav;

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::common::sets::FrameSet;
use crate::plugins::scheduler::{ScheduledEvent, TimerFired, dispatch_timers};

pub use synth::Tone;

/// Somewhere synthesized tones can go.
pub trait ToneSink: Send + Sync {
    fn sample_rate(&self) -> u32;
    fn submit(&mut self, tone: Tone, samples: Vec<f32>);
}

#[derive(Resource, Default)]
pub struct AudioOut {
    sink: Option<Box<dyn ToneSink>>,
    reported_silent: bool,
}

impl AudioOut {
    pub fn with_sink(sink: impl ToneSink + 'static) -> Self {
        Self {
            sink: Some(Box::new(sink)),
            reported_silent: false,
        }
    }

    /// Route tones to `sink`, replacing any previous one.
    pub fn install(&mut self, sink: impl ToneSink + 'static) {
        self.sink = Some(Box::new(sink));
        self.reported_silent = false;
    }

    pub fn is_silent(&self) -> bool {
        self.sink.is_none()
    }

    pub fn play(&mut self, tone: Tone) {
        let Some(sink) = self.sink.as_mut() else {
            if !self.reported_silent {
                debug!("no audio output; tones are muted");
                self.reported_silent = true;
            }
            return;
        };
        let samples = tone.synthesize(sink.sample_rate());
        sink.submit(tone, samples);
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<AudioOut>().add_systems(
        Update,
        play_combo_notes
            .in_set(FrameSet::Timers)
            .after(dispatch_timers),
    );
}

/// Sound the scheduled notes of a combo arpeggio.
pub fn play_combo_notes(mut fired: MessageReader<TimerFired>, mut audio: ResMut<AudioOut>) {
    for TimerFired(event) in fired.read() {
        if let ScheduledEvent::ComboNote { index, multiplier } = *event {
            audio.play(Tone::combo_note(index, multiplier));
        }
    }
}
