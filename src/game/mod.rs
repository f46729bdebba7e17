//! Game composition root.
//!
//! Provides two public configuration functions:
//! - `configure_full`: includes DefaultPlugins (window/render) + game plugins.
//! - `configure_headless`: minimal configuration for integration tests.
//!
//! Launcher-provided resources (`Tunables`, `LevelCatalog`, `LaunchOptions`,
//! `AudioOut`) are inserted before the plugins so their `init_resource` calls
//! keep them.

use bevy::prelude::*;
use bevy::window::WindowResolution;

use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins;
use crate::plugins::audio::AudioOut;
use crate::plugins::feedback::{Display, LogDisplay};
use crate::plugins::level::{LaunchOptions, LevelCatalog};

// Only compile these imports on Windows.
#[cfg(target_os = "windows")]
use bevy::render::{
    RenderPlugin,
    settings::{Backends, PowerPreference, WgpuSettings},
};

/// Everything the launcher decides before the first frame.
#[derive(Default)]
pub struct GameSetup {
    pub options: LaunchOptions,
    pub tunables: Tunables,
    pub catalog: LevelCatalog,
    pub audio: AudioOut,
}

impl GameSetup {
    pub fn install(self, app: &mut App) {
        app.insert_resource(self.options)
            .insert_resource(self.tunables)
            .insert_resource(self.catalog)
            .insert_resource(self.audio);
    }
}

pub fn run(setup: GameSetup) -> AppExit {
    let mut app = App::new();
    setup.install(&mut app);
    app.add_plugins(configure_full).run()
}

/// Full configuration for `cargo run`.
pub fn configure_full(app: &mut App) {
    let world = app
        .world()
        .get_resource::<Tunables>()
        .map_or_else(|| Tunables::default().world_size(), Tunables::world_size);

    let default_plugins = DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Bubble Trap".into(),
            resolution: WindowResolution::new(world.x as u32, world.y as u32),
            resizable: false,
            ..default()
        }),
        ..default()
    });

    // Force DX12 on Windows; Vulkan init is unreliable on some hybrid-GPU laptops.
    #[cfg(target_os = "windows")]
    let default_plugins = default_plugins.set(RenderPlugin {
        render_creation: WgpuSettings {
            backends: Some(Backends::DX12),
            power_preference: PowerPreference::HighPerformance,
            ..default()
        }
        .into(),
        ..default()
    });

    app.add_plugins(default_plugins);

    configure_game(app);
    plugins::register_render(app);
}

/// Headless configuration for integration tests.
///
/// Notes:
/// - Do NOT add DefaultPlugins.
/// - Do NOT add render-only plugins (camera/HUD).
/// - Score and combo text go to the log instead of the HUD.
pub fn configure_headless(app: &mut App) {
    configure_game(app);
    app.world_mut()
        .resource_mut::<Display>()
        .add_sink(LogDisplay);
}

/// Configuration shared by both full and headless apps.
fn configure_game(app: &mut App) {
    app.init_state::<GameState>();
    plugins::register_gameplay(app);
}
