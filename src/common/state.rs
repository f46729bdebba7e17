//! Global state machine.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum GameState {
    #[default]
    InGame,
}

/// Marker for everything owned by the running level session.
///
/// Starting a level despawns every entity carrying this marker.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct SessionEntity;
