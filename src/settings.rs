//! Run settings and difficulty presets
//!
//! Stored as JSON. Missing fields fall back to defaults, so an empty object
//! is a valid settings file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{
    ENEMIES_PER_WAVE, ENEMY_FIRE_CHANCE, KILLS_PER_WAVE, MAP_COLS, MAP_ROWS, MAX_MAP_SIZE,
    MAX_SUBSTEPS, SPAWN_INTERVAL,
};
use crate::sim::Rules;

/// Smallest map edge that still leaves room to move around
pub const MIN_MAP_SIZE: usize = 5;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "norm" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Multiplier on the seconds between spawns
    pub fn spawn_interval_scale(&self) -> f32 {
        match self {
            Difficulty::Easy => 1.5,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 0.7,
        }
    }

    /// Live enemy cap per wave number
    pub fn enemies_per_wave(&self) -> usize {
        match self {
            Difficulty::Easy => 3,
            Difficulty::Normal => ENEMIES_PER_WAVE,
            Difficulty::Hard => 7,
        }
    }

    /// Multiplier on the per-tick enemy fire chance
    pub fn fire_chance_scale(&self) -> f64 {
        match self {
            Difficulty::Easy => 0.5,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.5,
        }
    }
}

/// Run settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    /// Run seed; `None` lets the caller pick one
    pub seed: Option<u64>,
    pub map_rows: usize,
    pub map_cols: usize,
    /// Kills per wave number needed to advance the wave
    pub kills_per_wave: u32,
    /// Fixed-step driver catch-up limit per frame
    pub max_substeps: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            seed: None,
            map_rows: MAP_ROWS,
            map_cols: MAP_COLS,
            kills_per_wave: KILLS_PER_WAVE,
            max_substeps: MAX_SUBSTEPS,
        }
    }
}

impl Settings {
    /// Create settings from a difficulty preset
    pub fn from_preset(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.map_rows < MIN_MAP_SIZE || self.map_cols < MIN_MAP_SIZE {
            return Err(SettingsError::Invalid(format!(
                "map must be at least {MIN_MAP_SIZE}x{MIN_MAP_SIZE}, got {}x{}",
                self.map_cols, self.map_rows
            )));
        }
        if self.map_rows > MAX_MAP_SIZE || self.map_cols > MAX_MAP_SIZE {
            return Err(SettingsError::Invalid(format!(
                "map must be at most {MAX_MAP_SIZE}x{MAX_MAP_SIZE}, got {}x{}",
                self.map_cols, self.map_rows
            )));
        }
        if self.kills_per_wave == 0 {
            return Err(SettingsError::Invalid("kills_per_wave must be positive".into()));
        }
        if self.max_substeps == 0 {
            return Err(SettingsError::Invalid("max_substeps must be positive".into()));
        }
        Ok(())
    }

    /// Gameplay rules for these settings
    pub fn rules(&self) -> Rules {
        let difficulty = self.difficulty;
        Rules {
            map_rows: self.map_rows,
            map_cols: self.map_cols,
            spawn_interval: SPAWN_INTERVAL * difficulty.spawn_interval_scale(),
            enemies_per_wave: difficulty.enemies_per_wave(),
            enemy_fire_chance: (ENEMY_FIRE_CHANCE * difficulty.fire_chance_scale()).min(1.0),
            kills_per_wave: self.kills_per_wave,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let settings = Self::from_json(&fs::read_to_string(path)?)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
