use std::path::PathBuf;

use log::warn;

use crate::error::{Error, Result};

const DEFAULT_TICK_MS: u64 = 16;
const DEFAULT_RENDER_FPS: u64 = 60;

/// World geometry shared by the generator, resolver and camera.
///
/// Built once and passed by reference; nothing in the crate reads world
/// dimensions from ambient state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldConfig {
    /// Edge of one sprite tile before scaling.
    pub tile_size: u32,
    pub scale: u32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Inset applied to the actor's corners when testing against walls.
    pub collision_margin: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            tile_size: 16,
            scale: 2,
            viewport_width: 400.0,
            viewport_height: 300.0,
            collision_margin: 4.0,
        }
    }
}

impl WorldConfig {
    /// World-space edge length of one grid cell.
    pub fn tile_px(&self) -> f32 {
        (self.tile_size * self.scale) as f32
    }

    /// Largest per-frame displacement that cannot skip over a one-cell wall.
    pub fn max_safe_step(&self) -> f32 {
        self.tile_px() - 2.0 * self.collision_margin - 0.01
    }

    pub fn validate(&self) -> Result<()> {
        if self.tile_size == 0 || self.scale == 0 {
            return Err(Error::InvalidWorldConfig(format!(
                "tile size {} and scale {} must both be non-zero",
                self.tile_size, self.scale
            )));
        }
        if !(self.viewport_width > 0.0 && self.viewport_height > 0.0) {
            return Err(Error::InvalidWorldConfig(format!(
                "viewport {}x{} must be positive",
                self.viewport_width, self.viewport_height
            )));
        }
        if !(self.collision_margin >= 0.0 && self.collision_margin < self.tile_px() / 2.0) {
            return Err(Error::InvalidWorldConfig(format!(
                "collision margin {} must be in [0, {})",
                self.collision_margin,
                self.tile_px() / 2.0
            )));
        }
        Ok(())
    }
}

/// Size and speed for one level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelShape {
    pub rows: usize,
    pub cols: usize,
    /// Actor speed in world pixels per frame.
    pub speed: f32,
}

/// Maps a level number to its size, speed and content.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelPolicy {
    pub base_rows: usize,
    pub base_cols: usize,
    /// Fractional size increase per level past the first.
    pub size_growth: f32,
    pub base_speed: f32,
    pub speed_growth: f32,
    pub max_speed: f32,
    /// One more room unlocks every this many levels. Zero disables rooms.
    pub levels_per_room: u32,
    pub max_collectibles: usize,
}

impl LevelPolicy {
    /// Screen-relative defaults: level one fills exactly one viewport.
    pub fn for_world(config: &WorldConfig) -> Self {
        let tile_px = config.tile_px();
        Self {
            base_rows: (config.viewport_height / tile_px).floor() as usize,
            base_cols: (config.viewport_width / tile_px).floor() as usize,
            size_growth: 0.25,
            base_speed: 1.2 * config.scale as f32,
            speed_growth: 0.05,
            max_speed: config.max_safe_step(),
            levels_per_room: 3,
            max_collectibles: 6,
        }
    }

    pub fn shape(&self, level: u32) -> LevelShape {
        let steps = level.saturating_sub(1) as f32;
        let growth = 1.0 + steps * self.size_growth;
        let rows = (self.base_rows as f32 * growth).floor() as usize;
        let cols = (self.base_cols as f32 * growth).floor() as usize;

        let mut speed = self.base_speed * (1.0 + steps * self.speed_growth);
        if speed > self.max_speed {
            warn!(
                "level {level}: speed {speed:.2} capped at {:.2} to avoid tunneling",
                self.max_speed
            );
            speed = self.max_speed;
        }

        LevelShape { rows, cols, speed }
    }

    /// Rooms requested for a level. The generator caps this at its shape count.
    pub fn room_count(&self, level: u32) -> usize {
        match self.levels_per_room {
            0 => 0,
            every => (level / every) as usize,
        }
    }

    pub fn collectible_count(&self, level: u32) -> usize {
        ((level / 2) as usize).min(self.max_collectibles)
    }
}

/// Runtime settings for the terminal front end.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub tick_ms: u64,
    pub render_fps: u64,
    pub seed: Option<u64>,
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
            render_fps: DEFAULT_RENDER_FPS,
            seed: None,
            log_file: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through `lookup`; zero rates fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let tick_ms = parse_u64(&lookup, "MAZE_TICK_MS")?
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_TICK_MS);
        let render_fps = parse_u64(&lookup, "MAZE_FPS")?
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_RENDER_FPS);
        let seed = parse_u64(&lookup, "MAZE_SEED")?;
        let log_file = lookup("MAZE_LOG_FILE")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            tick_ms,
            render_fps,
            seed,
            log_file,
        })
    }
}

fn parse_u64(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<u64>> {
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| Error::InvalidSetting { name, value }),
    }
}
