//! Triangle-wave tone synthesis.

use std::time::Duration;

/// Output gain applied to every tone.
pub const GAIN: f32 = 0.02;

/// Shortest tone ever rendered.
pub const MIN_DURATION: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency: f32,
    pub duration: Duration,
}

impl Tone {
    pub fn new(frequency: f32, duration: Duration) -> Self {
        Self {
            frequency,
            duration: duration.max(MIN_DURATION),
        }
    }

    /// Blip when a projectile traps an enemy.
    pub fn trap() -> Self {
        Self::new(880.0, Duration::from_millis(50))
    }

    /// Blip when a projectile is fired.
    pub fn shoot() -> Self {
        Self::new(660.0, Duration::from_millis(40))
    }

    /// Pop sound; pitch climbs with the multiplier.
    pub fn pop(multiplier: u8) -> Self {
        Self::new(520.0 + f32::from(multiplier) * 40.0, Duration::from_millis(80))
    }

    /// Note `index` (0..3) of the combo arpeggio.
    pub fn combo_note(index: u8, multiplier: u8) -> Self {
        Self::new(
            660.0 + f32::from(index) * 80.0 + f32::from(multiplier) * 10.0,
            Duration::from_millis(50),
        )
    }

    pub fn sample_count(&self, sample_rate: u32) -> usize {
        (self.duration.as_secs_f64() * f64::from(sample_rate)).round() as usize
    }

    /// Render mono samples in `[-GAIN, GAIN]`.
    pub fn synthesize(&self, sample_rate: u32) -> Vec<f32> {
        let step = f64::from(self.frequency) / f64::from(sample_rate);
        (0..self.sample_count(sample_rate))
            .map(|i| {
                let phase = (i as f64 * step).fract() as f32;
                triangle(phase) * GAIN
            })
            .collect()
    }
}

/// Unit triangle over one period: -1 at phase 0, +1 at 0.5, back to -1.
#[inline]
fn triangle(phase: f32) -> f32 {
    1.0 - 4.0 * (phase - 0.5).abs()
}
