//! Speaker output through `bevy_audio`.
//!
//! Each tone becomes a one-shot [`ToneClip`] asset played by an
//! [`AudioPlayer`] that despawns when the clip ends. Without an output device
//! bevy logs once and the players are dropped with the session.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use bevy::audio::{AddAudioSource, Decodable, SeekError, Source};
use bevy::prelude::*;

use super::{AudioOut, Tone, ToneSink};
use crate::common::sets::FrameSet;
use crate::common::state::SessionEntity;

pub const SPEAKER_SAMPLE_RATE: u32 = 44_100;

/// Mono samples of one synthesized tone.
#[derive(Asset, TypePath, Clone)]
pub struct ToneClip {
    samples: Arc<[f32]>,
    sample_rate: u32,
}

impl ToneClip {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples: samples.into(),
            sample_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl Decodable for ToneClip {
    type DecoderItem = f32;
    type Decoder = ToneDecoder;

    fn decoder(&self) -> Self::Decoder {
        ToneDecoder {
            samples: Arc::clone(&self.samples),
            sample_rate: self.sample_rate,
            cursor: 0,
        }
    }
}

pub struct ToneDecoder {
    samples: Arc<[f32]>,
    sample_rate: u32,
    cursor: usize,
}

impl Iterator for ToneDecoder {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let sample = self.samples.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(sample)
    }
}

impl Source for ToneDecoder {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.samples.len() - self.cursor)
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f64(
            self.samples.len() as f64 / f64::from(self.sample_rate),
        ))
    }

    fn try_seek(&mut self, _pos: Duration) -> Result<(), SeekError> {
        Ok(())
    }
}

/// Tone sink that queues clips until [`spawn_tone_players`] picks them up.
#[derive(Clone, Default)]
pub struct SpeakerSink {
    pending: Arc<Mutex<Vec<ToneClip>>>,
}

impl SpeakerSink {
    pub fn take_pending(&self) -> Vec<ToneClip> {
        match self.pending.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(_) => Vec::new(),
        }
    }
}

impl ToneSink for SpeakerSink {
    fn sample_rate(&self) -> u32 {
        SPEAKER_SAMPLE_RATE
    }

    fn submit(&mut self, _tone: Tone, samples: Vec<f32>) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.push(ToneClip::new(samples, SPEAKER_SAMPLE_RATE));
        }
    }
}

/// The speaker sink shared with [`AudioOut`].
#[derive(Resource, Clone, Default)]
pub struct SpeakerQueue(pub SpeakerSink);

/// Requires `AudioPlugin`. A sink configured by the launcher (WAV capture)
/// is kept and speaker output stays off.
pub fn plugin(app: &mut App) {
    app.add_audio_source::<ToneClip>();

    let sink = SpeakerSink::default();
    let installed = {
        let mut audio = app.world_mut().get_resource_or_init::<AudioOut>();
        if audio.is_silent() {
            audio.install(sink.clone());
            true
        } else {
            false
        }
    };
    if !installed {
        info!("tone sink already configured; speaker output disabled");
        return;
    }

    app.insert_resource(SpeakerQueue(sink))
        .add_systems(Update, spawn_tone_players.in_set(FrameSet::Feedback));
}

/// Start one despawning player per queued tone.
pub fn spawn_tone_players(
    mut commands: Commands,
    queue: Res<SpeakerQueue>,
    mut clips: ResMut<Assets<ToneClip>>,
) {
    for clip in queue.0.take_pending() {
        let handle = clips.add(clip);
        commands.spawn((
            Name::new("Tone"),
            AudioPlayer(handle),
            PlaybackSettings::DESPAWN,
            SessionEntity,
        ));
    }
}
