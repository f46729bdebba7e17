//! WAV capture sink: appends every synthesized tone to a mono 16-bit file.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use bevy::prelude::*;

use super::synth::Tone;
use super::ToneSink;

pub const CAPTURE_SAMPLE_RATE: u32 = 44_100;

pub struct WavCapture {
    writer: hound::WavWriter<BufWriter<File>>,
}

impl WavCapture {
    pub fn create(path: &Path) -> Result<Self, hound::Error> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: CAPTURE_SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        Ok(Self {
            writer: hound::WavWriter::create(path, spec)?,
        })
    }
}

impl ToneSink for WavCapture {
    fn sample_rate(&self) -> u32 {
        CAPTURE_SAMPLE_RATE
    }

    fn submit(&mut self, _tone: Tone, samples: Vec<f32>) {
        for s in samples {
            let v = (s.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
            if let Err(e) = self.writer.write_sample(v) {
                warn!("audio capture stopped: {e}");
                return;
            }
        }
    }
}
