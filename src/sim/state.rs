//! Game state machine
//!
//! `Menu -> Playing <-> Paused`, `Playing -> LevelComplete -> Playing | GameOver`,
//! `Playing -> GameOver` when lives run out. Transitions requested from the
//! wrong state are ignored: double taps on UI buttons are expected.

use serde::{Deserialize, Serialize};

use crate::persistence::HighScoreStore;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Waiting for the first start
    Menu,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Level cleared, waiting for `next_level`
    LevelComplete,
    /// Run ended (lives exhausted or every level cleared)
    GameOver,
}

/// Session state. Only `GameStateManager` mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub status: GameStatus,
    pub lives: u32,
    pub level_index: usize,
    pub total_levels: usize,
    pub total_score: u64,
    pub high_score: u64,
    /// GameOver was reached by clearing the final level
    pub victory: bool,
}

/// Read-only view handed to hosts and the scene painter
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub status: GameStatus,
    pub lives: u32,
    pub level_index: usize,
    pub total_levels: usize,
    pub total_score: u64,
    /// Points earned so far in the current level
    pub level_score: u64,
    pub high_score: u64,
    pub victory: bool,
}

impl GameSnapshot {
    pub fn new(state: &GameState, level_score: u64) -> Self {
        Self {
            status: state.status,
            lives: state.lives,
            level_index: state.level_index,
            total_levels: state.total_levels,
            total_score: state.total_score,
            level_score,
            high_score: state.high_score,
            victory: state.victory,
        }
    }

    /// Running score including the level in progress
    pub fn display_score(&self) -> u64 {
        match self.status {
            GameStatus::Playing | GameStatus::Paused => self.total_score + self.level_score,
            _ => self.total_score,
        }
    }
}

pub struct GameStateManager {
    state: GameState,
    starting_lives: u32,
    store: Box<dyn HighScoreStore>,
}

impl GameStateManager {
    /// Create a manager in `Menu`, reading the persisted high score
    pub fn new(starting_lives: u32, total_levels: usize, mut store: Box<dyn HighScoreStore>) -> Self {
        let high_score = store.load().unwrap_or_else(|e| {
            log::warn!("Could not read high score, starting from 0: {}", e);
            0
        });
        Self {
            state: GameState {
                status: GameStatus::Menu,
                lives: starting_lives,
                level_index: 0,
                total_levels,
                total_score: 0,
                high_score,
                victory: false,
            },
            starting_lives,
            store,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    fn ignored(&self, transition: &str) -> bool {
        log::debug!("Ignoring {} while {:?}", transition, self.state.status);
        false
    }

    /// Fresh session: full lives, zero score, first level
    pub fn start_new_game(&mut self) -> bool {
        if !matches!(self.state.status, GameStatus::Menu | GameStatus::GameOver) {
            return self.ignored("start_new_game");
        }
        self.state.lives = self.starting_lives;
        self.state.total_score = 0;
        self.state.level_index = 0;
        self.state.victory = false;
        self.state.status = GameStatus::Playing;
        log::info!("New game: {} lives, {} levels", self.state.lives, self.state.total_levels);
        true
    }

    pub fn complete_level(&mut self, score: u64) -> bool {
        if self.state.status != GameStatus::Playing {
            return self.ignored("complete_level");
        }
        self.state.total_score += score;
        self.state.status = GameStatus::LevelComplete;
        log::info!(
            "Level {} complete: +{} (total {})",
            self.state.level_index + 1,
            score,
            self.state.total_score
        );
        true
    }

    /// Advance to the next level, or end the run after the final one
    pub fn next_level(&mut self) -> bool {
        if self.state.status != GameStatus::LevelComplete {
            return self.ignored("next_level");
        }
        self.state.level_index += 1;
        if self.state.level_index < self.state.total_levels {
            self.state.status = GameStatus::Playing;
        } else {
            self.enter_game_over(true);
        }
        true
    }

    /// Lose one life. The caller rebuilds the level if play continues.
    pub fn lose_life(&mut self) -> bool {
        if self.state.status != GameStatus::Playing {
            return self.ignored("lose_life");
        }
        self.state.lives = self.state.lives.saturating_sub(1);
        log::info!("Life lost, {} remaining", self.state.lives);
        if self.state.lives == 0 {
            self.enter_game_over(false);
        }
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.state.status = match self.state.status {
            GameStatus::Playing => GameStatus::Paused,
            GameStatus::Paused => GameStatus::Playing,
            _ => return self.ignored("toggle_pause"),
        };
        true
    }

    /// Replay the current level from scratch, resuming if paused
    pub fn restart_level(&mut self) -> bool {
        if !matches!(self.state.status, GameStatus::Playing | GameStatus::Paused) {
            return self.ignored("restart_level");
        }
        self.state.status = GameStatus::Playing;
        true
    }

    fn enter_game_over(&mut self, victory: bool) {
        self.state.status = GameStatus::GameOver;
        self.state.victory = victory;
        log::info!(
            "Game over ({}): score {}",
            if victory { "victory" } else { "out of lives" },
            self.state.total_score
        );

        if self.state.total_score >= self.state.high_score {
            self.state.high_score = self.state.total_score;
            match self.store.save(self.state.high_score) {
                Ok(()) => log::info!("High score saved: {}", self.state.high_score),
                Err(e) => log::warn!("Could not save high score: {}", e),
            }
        }
    }
}
