//! Feature plugins.

use bevy::prelude::*;

pub mod audio;
pub mod collision;
pub mod core;
pub mod enemies;
pub mod feedback;
pub mod input;
pub mod level;
pub mod physics;
pub mod player;
pub mod projectiles;
pub mod scheduler;
pub mod scoring;

// Render-only
pub mod camera;
pub mod hud;

/// Register gameplay plugins that work in headless tests.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    scheduler::plugin(app);
    audio::plugin(app);
    input::plugin(app);
    physics::plugin(app);
    player::plugin(app);
    projectiles::plugin(app);
    enemies::plugin(app);
    collision::plugin(app);
    scoring::plugin(app);
    feedback::plugin(app);
    level::plugin(app);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    camera::plugin(app);
    hud::plugin(app);
    audio::live::plugin(app);
}
