//! Session bookkeeping and the game phase state machine
//!
//! Score, health and wave only change through the named transitions below.

use serde::{Deserialize, Serialize};

use crate::consts::PLAYER_MAX_HEALTH;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing simulated
    Menu,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended (health reached zero)
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Menu => "menu",
            GamePhase::Playing => "playing",
            GamePhase::Paused => "paused",
            GamePhase::GameOver => "gameover",
        }
    }
}

/// Score, health, wave and phase for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub(crate) score: u64,
    pub(crate) health: f32,
    pub(crate) wave: u32,
    pub(crate) phase: GamePhase,
    /// Kills since the current wave began
    pub(crate) wave_kills: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            score: 0,
            health: PLAYER_MAX_HEALTH,
            wave: 1,
            phase: GamePhase::Menu,
            wave_kills: 0,
        }
    }

    #[inline]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[inline]
    pub fn health(&self) -> f32 {
        self.health
    }

    #[inline]
    pub fn wave(&self) -> u32 {
        self.wave
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::info!("Phase {} -> {}", self.phase.as_str(), phase.as_str());
            self.phase = phase;
        }
    }

    fn reset_run(&mut self) {
        self.score = 0;
        self.health = PLAYER_MAX_HEALTH;
        self.wave = 1;
        self.wave_kills = 0;
    }

    /// Menu -> Playing with fresh stats
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Menu {
            return false;
        }
        self.reset_run();
        self.set_phase(GamePhase::Playing);
        true
    }

    /// Playing -> Paused
    pub fn pause(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.set_phase(GamePhase::Paused);
        true
    }

    /// Paused -> Playing
    pub fn resume(&mut self) -> bool {
        if self.phase != GamePhase::Paused {
            return false;
        }
        self.set_phase(GamePhase::Playing);
        true
    }

    /// Pause key: toggles between Playing and Paused, ignored elsewhere
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            GamePhase::Playing => self.pause(),
            GamePhase::Paused => self.resume(),
            _ => false,
        }
    }

    /// GameOver -> Playing with fresh stats.
    ///
    /// Restarting from the pause menu is allowed as well.
    pub fn restart(&mut self) -> bool {
        if !matches!(self.phase, GamePhase::GameOver | GamePhase::Paused) {
            return false;
        }
        self.reset_run();
        self.set_phase(GamePhase::Playing);
        true
    }

    /// Any phase -> Menu
    pub fn to_menu(&mut self) {
        self.set_phase(GamePhase::Menu);
    }

    pub fn add_score(&mut self, amount: u64) {
        self.score = self.score.saturating_add(amount);
    }

    /// Apply damage, clamped at zero. Entering zero while playing ends the
    /// run; returns true when this call caused it.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.health = (self.health - amount.max(0.0)).max(0.0);
        if self.health <= 0.0 {
            log::info!("Player destroyed on wave {} with score {}", self.wave, self.score);
            self.set_phase(GamePhase::GameOver);
            return true;
        }
        false
    }

    /// Count a kill; advances the wave once `wave * kills_per_wave` kills
    /// land. Returns true when the wave advanced. Ignored outside Playing.
    pub fn record_kill(&mut self, score: u64, kills_per_wave: u32) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.add_score(score);
        self.wave_kills += 1;
        if kills_per_wave > 0 && self.wave_kills >= self.wave * kills_per_wave {
            self.next_wave();
            return true;
        }
        false
    }

    pub fn next_wave(&mut self) {
        self.wave += 1;
        self.wave_kills = 0;
        log::info!("Wave {} begins", self.wave);
    }
}
