//! Level data: platforms, enemy spawns, player start.
//!
//! Pure data. The built-in catalogue holds levels 1-3; a TOML file with
//! `[[level]]` tables can replace it. Lookups of unknown ids fall back to
//! level 1, which every catalogue must contain.

use std::path::Path;

use bevy::prelude::*;
use serde::Deserialize;

use crate::common::error::ConfigError;

/// Id used whenever the requested level does not exist.
pub const FALLBACK_LEVEL: u32 = 1;

/// Unscaled platform block.
pub const BLOCK_SIZE: Vec2 = Vec2::new(64.0, 16.0);

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl From<Point> for Vec2 {
    fn from(p: Point) -> Self {
        Vec2::new(p.x, p.y)
    }
}

/// A platform block centred on (x, y), optionally scaled.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PlatformDef {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub w: Option<f32>,
    #[serde(default)]
    pub h: Option<f32>,
}

impl PlatformDef {
    const fn block(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            w: None,
            h: None,
        }
    }

    const fn floor(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            w: Some(12.5),
            h: Some(2.0),
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        BLOCK_SIZE * Vec2::new(self.w.unwrap_or(1.0), self.h.unwrap_or(1.0))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LevelDef {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    pub platforms: Vec<PlatformDef>,
    pub enemy_spawns: Vec<Point>,
    pub player: Point,
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(rename = "level")]
    levels: Vec<LevelDef>,
}

/// Levels in id order.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct LevelCatalog {
    levels: Vec<LevelDef>,
    fallback: usize,
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LevelCatalog {
    /// Build a catalogue. Later duplicates of an id replace earlier ones.
    pub fn new(mut levels: Vec<LevelDef>) -> Result<Self, ConfigError> {
        for level in &levels {
            let bad = level.platforms.iter().position(|p| {
                p.w.is_some_and(|w| w <= 0.0) || p.h.is_some_and(|h| h <= 0.0)
            });
            if let Some(index) = bad {
                return Err(ConfigError::BadPlatformScale {
                    level: level.id,
                    index,
                });
            }
        }

        levels.reverse();
        levels.sort_by_key(|l| l.id);
        levels.dedup_by_key(|l| l.id);

        let fallback = levels
            .iter()
            .position(|l| l.id == FALLBACK_LEVEL)
            .ok_or(ConfigError::MissingFallbackLevel(FALLBACK_LEVEL))?;

        Ok(Self { levels, fallback })
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let file: CatalogFile = toml::from_str(text)?;
        Self::new(file.levels)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Exact lookup.
    pub fn find(&self, id: u32) -> Option<&LevelDef> {
        self.levels
            .binary_search_by_key(&id, |l| l.id)
            .ok()
            .map(|i| &self.levels[i])
    }

    /// Lookup with fallback to level 1.
    pub fn get(&self, id: u32) -> &LevelDef {
        self.find(id).unwrap_or(&self.levels[self.fallback])
    }

    /// (id, name) pairs for a level menu.
    pub fn entries(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        self.levels.iter().map(|l| (l.id, l.name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn builtin() -> Self {
        let p = |x, y| Point { x, y };
        let levels = vec![
            LevelDef {
                id: 1,
                name: "Intro Platforms".into(),
                platforms: vec![
                    PlatformDef::floor(400.0, 580.0),
                    PlatformDef::block(150.0, 420.0),
                    PlatformDef::block(650.0, 360.0),
                    PlatformDef::block(400.0, 280.0),
                ],
                enemy_spawns: vec![p(600.0, 500.0), p(450.0, 250.0)],
                player: p(100.0, 520.0),
            },
            LevelDef {
                id: 2,
                name: "Gaps & Traps".into(),
                platforms: vec![
                    PlatformDef::floor(400.0, 580.0),
                    PlatformDef::block(120.0, 420.0),
                    PlatformDef::block(280.0, 380.0),
                    PlatformDef::block(440.0, 340.0),
                    PlatformDef::block(600.0, 300.0),
                    PlatformDef::block(760.0, 260.0),
                ],
                enemy_spawns: vec![p(700.0, 250.0), p(500.0, 330.0), p(300.0, 410.0)],
                player: p(80.0, 520.0),
            },
            LevelDef {
                id: 3,
                name: "Stairs Run".into(),
                platforms: vec![
                    PlatformDef::floor(400.0, 580.0),
                    PlatformDef::block(120.0, 500.0),
                    PlatformDef::block(240.0, 440.0),
                    PlatformDef::block(360.0, 380.0),
                    PlatformDef::block(480.0, 320.0),
                    PlatformDef::block(600.0, 260.0),
                    PlatformDef::block(720.0, 200.0),
                ],
                enemy_spawns: vec![p(700.0, 180.0), p(500.0, 300.0), p(260.0, 460.0)],
                player: p(100.0, 540.0),
            },
        ];
        Self {
            levels,
            fallback: 0,
        }
    }
}
