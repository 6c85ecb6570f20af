use std::time::{Duration, Instant};

use crate::game::RoundState;

/// Per-session statistics; nothing here outlives the process
pub struct GameMetrics {
    last_update: Instant,
    /// Time spent in the active state this round
    pub elapsed_time: Duration,
    pub best_score: u32,
    pub games_played: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            last_update: Instant::now(),
            elapsed_time: Duration::ZERO,
            best_score: 0,
            games_played: 0,
        }
    }

    /// Sample the clock; time only counts while the round is active
    pub fn update(&mut self, round: RoundState) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_update);
        self.last_update = now;
        self.advance(delta, round);
    }

    pub fn advance(&mut self, delta: Duration, round: RoundState) {
        if round == RoundState::Active {
            self.elapsed_time += delta;
        }
    }

    pub fn on_game_start(&mut self) {
        self.last_update = Instant::now();
        self.elapsed_time = Duration::ZERO;
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.games_played += 1;
        if final_score > self.best_score {
            self.best_score = final_score;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
