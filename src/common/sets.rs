//! Per-frame ordering.
//!
//! ```text
//! Session -> Clock -> Input -> Control -> Movement -> Overlap
//!         -> Rules -> Timers -> Feedback -> Present
//! ```
//!
//! Everything runs in `Update`, once per displayed frame. Sets are chained so
//! a frame always sees the previous set's writes.

use bevy::prelude::*;

use crate::common::state::GameState;

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSet {
    /// Level (re)initialisation.
    Session,
    Clock,
    /// Keyboard + touch merged into one intent snapshot.
    Input,
    /// Intent applied to the player (velocity, jump, shoot).
    Control,
    Movement,
    Overlap,
    /// Enemy patrol and scoring.
    Rules,
    /// Deferred one-shot callbacks.
    Timers,
    Feedback,
    /// Level space -> render transforms.
    Present,
}

pub fn configure(app: &mut App) {
    app.configure_sets(
        Update,
        (
            FrameSet::Session,
            FrameSet::Clock,
            FrameSet::Input,
            FrameSet::Control,
            FrameSet::Movement,
            FrameSet::Overlap,
            FrameSet::Rules,
            FrameSet::Timers,
            FrameSet::Feedback,
            FrameSet::Present,
        )
            .chain()
            .run_if(in_state(GameState::InGame)),
    );
}
