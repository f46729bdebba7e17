//! Common, shared types.

pub mod clock;
pub mod error;
pub mod geometry;
pub mod sets;
pub mod state;
pub mod tunables;

#[cfg(test)]
pub mod test_utils;
