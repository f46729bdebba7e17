//! Tunable gameplay constants.
//!
//! `Default` is the shipped game. A TOML file may override any subset of the
//! fields; missing keys keep their default.

use std::path::Path;

use bevy::prelude::*;
use serde::Deserialize;

use crate::common::error::ConfigError;

#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Tunables {
    // World
    pub world_width: f32,
    pub world_height: f32,
    pub gravity: f32,

    // Player
    pub player_speed: f32,
    pub jump_speed: f32,
    pub player_hitbox_width: f32,
    pub player_hitbox_height: f32,

    // Projectiles
    pub projectile_speed: f32,
    pub projectile_rise_speed: f32,
    pub projectile_rise_distance: f32,
    pub projectile_lifetime_ms: u64,
    pub projectile_spawn_lift: f32,
    pub projectile_size: f32,

    // Enemies
    pub enemy_speed: f32,
    pub enemy_size: f32,
    pub enemy_bounce: f32,
    pub patrol_min_x: f32,
    pub patrol_max_x: f32,
    pub trapped_rise_speed: f32,
    pub trapped_duration_ms: u64,

    // Scoring
    pub combo_window_ms: u64,
    pub max_multiplier: u8,
    pub pop_base_score: u64,

    // Feedback
    pub floating_text_ms: u64,
    pub floating_text_rise: f32,
    pub particle_count: usize,
    pub particle_speed: f32,
    pub particle_lifespan_ms: u64,
    pub particle_scale: f32,
    pub feedback_seed: u64,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            world_width: 800.0,
            world_height: 600.0,
            gravity: 800.0,

            player_speed: 220.0,
            jump_speed: 420.0,
            player_hitbox_width: 24.0,
            player_hitbox_height: 28.0,

            projectile_speed: 200.0,
            projectile_rise_speed: 120.0,
            projectile_rise_distance: 140.0,
            projectile_lifetime_ms: 1800,
            projectile_spawn_lift: 10.0,
            projectile_size: 16.0,

            enemy_speed: 80.0,
            enemy_size: 32.0,
            enemy_bounce: 0.1,
            patrol_min_x: 50.0,
            patrol_max_x: 750.0,
            trapped_rise_speed: 50.0,
            trapped_duration_ms: 2500,

            combo_window_ms: 1200,
            max_multiplier: 9,
            pop_base_score: 100,

            floating_text_ms: 800,
            floating_text_rise: 30.0,
            particle_count: 20,
            particle_speed: 120.0,
            particle_lifespan_ms: 400,
            particle_scale: 0.6,
            feedback_seed: 0x0B0B_B1E5,
        }
    }
}

impl Tunables {
    /// Parse overrides from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let tunables: Tunables = toml::from_str(text)?;
        tunables.validate()?;
        Ok(tunables)
    }

    /// Read and parse a TOML overrides file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn player_half_extents(&self) -> Vec2 {
        Vec2::new(self.player_hitbox_width, self.player_hitbox_height) * 0.5
    }

    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.world_width, self.world_height)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.world_width <= 0.0 || self.world_height <= 0.0 {
            return Err(ConfigError::Invalid("world size must be positive".into()));
        }
        if self.max_multiplier == 0 {
            return Err(ConfigError::Invalid("max_multiplier must be at least 1".into()));
        }
        if self.patrol_min_x >= self.patrol_max_x {
            return Err(ConfigError::Invalid(
                "patrol_min_x must be below patrol_max_x".into(),
            ));
        }
        Ok(())
    }
}
