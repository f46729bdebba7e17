//! Session clock.
//!
//! All rule timestamps (trap expiry, combo window, lifetimes) are measured on
//! this clock, which restarts at zero whenever a level session begins.

use std::time::Duration;

use bevy::prelude::*;

/// Largest step the movement integrator accepts, so a stalled frame cannot
/// tunnel bodies through 16-unit platforms.
pub const MAX_STEP: Duration = Duration::from_millis(50);

#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct SessionClock {
    elapsed: Duration,
    delta: Duration,
}

impl SessionClock {
    /// Milliseconds since the session started.
    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }

    /// Seconds covered by the current frame, clamped to [`MAX_STEP`].
    #[inline]
    pub fn step_secs(&self) -> f32 {
        self.delta.min(MAX_STEP).as_secs_f32()
    }

    pub fn advance(&mut self, dt: Duration) {
        self.delta = dt;
        self.elapsed += dt;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

pub fn advance_clock(time: Res<Time>, mut clock: ResMut<SessionClock>) {
    clock.advance(time.delta());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_accumulates_and_reset_rewinds() {
        let mut clock = SessionClock::default();
        clock.advance(Duration::from_millis(16));
        clock.advance(Duration::from_millis(17));
        assert_eq!(clock.now_ms(), 33);

        clock.reset();
        assert_eq!(clock.now_ms(), 0);
        assert_eq!(clock.step_secs(), 0.0);
    }

    #[test]
    fn step_is_clamped() {
        let mut clock = SessionClock::default();
        clock.advance(Duration::from_millis(400));
        assert_eq!(clock.now_ms(), 400);
        assert!((clock.step_secs() - 0.05).abs() < 1e-6);
    }
}
