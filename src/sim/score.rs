//! Score, combo and lives bookkeeping

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreManager {
    score: u64,
    combo_count: u32,
    combo_multiplier: f64,
    lives: u32,
    initial_lives: u32,
    /// Lives lost over the run
    miss_count: u32,
    /// No life lost yet
    perfect: bool,

    base_score: u32,
    combo_threshold: u32,
    combo_step: f64,
    perfect_bonus: f64,
}

impl ScoreManager {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            score: 0,
            combo_count: 0,
            combo_multiplier: 1.0,
            lives: config.initial_lives,
            initial_lives: config.initial_lives,
            miss_count: 0,
            perfect: true,
            base_score: config.score_per_block,
            combo_threshold: config.combo_threshold.max(1),
            combo_step: config.combo_multiplier,
            perfect_bonus: config.perfect_bonus_multiplier,
        }
    }

    /// Award a correct block. Returns the points added.
    ///
    /// The multiplier steps up once per full `combo_threshold` reached,
    /// counting the block being scored.
    pub fn add_block_score(&mut self) -> u64 {
        self.combo_count += 1;

        let level = self.combo_count / self.combo_threshold;
        self.combo_multiplier = 1.0 + f64::from(level) * (self.combo_step - 1.0);

        let added = (f64::from(self.base_score) * self.combo_multiplier).floor() as u64;
        self.score += added;
        added
    }

    pub fn reset_combo(&mut self) {
        self.combo_count = 0;
        self.combo_multiplier = 1.0;
    }

    /// Lose a life. Returns true when no lives are left.
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.miss_count += 1;
        self.perfect = false;
        self.reset_combo();
        self.is_game_over()
    }

    pub fn is_game_over(&self) -> bool {
        self.lives == 0
    }

    /// Score with the no-miss bonus applied if the run is still perfect
    pub fn final_score(&self) -> u64 {
        if self.perfect {
            (self.score as f64 * self.perfect_bonus).floor() as u64
        } else {
            self.score
        }
    }

    /// Refill lives after a game over; score and perfect flag are kept
    pub fn continue_game(&mut self) {
        self.lives = self.initial_lives;
    }

    /// Start a new run
    pub fn reset(&mut self) {
        self.score = 0;
        self.reset_combo();
        self.lives = self.initial_lives;
        self.miss_count = 0;
        self.perfect = true;
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn combo_count(&self) -> u32 {
        self.combo_count
    }

    pub fn combo_multiplier(&self) -> f64 {
        self.combo_multiplier
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn miss_count(&self) -> u32 {
        self.miss_count
    }

    pub fn is_perfect(&self) -> bool {
        self.perfect
    }
}
