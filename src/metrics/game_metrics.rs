use std::time::{Duration, Instant};

/// Session-level counters shown in the interactive HUD.
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub record: u32,
    pub games_played: u32,
    total_score: u64,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            record: 0,
            games_played: 0,
            total_score: 0,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.games_played += 1;
        self.total_score += final_score as u64;
        if final_score > self.record {
            self.record = final_score;
        }
    }

    /// Average score across all finished games this session.
    pub fn average_score(&self) -> f32 {
        if self.games_played == 0 {
            0.0
        } else {
            self.total_score as f32 / self.games_played as f32
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
