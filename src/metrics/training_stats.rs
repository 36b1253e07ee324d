//! Training statistics tracking for DQN
//!
//! Tracks per-game scores and losses during training. The cumulative mean
//! score is the primary learning-curve signal; losses are smoothed over a
//! rolling window since single TD steps are noisy.

use std::collections::VecDeque;

/// Training progress tracker.
///
/// Keeps the full score history (games are short and the curve is the point
/// of training), the best score so far, and rolling windows over recent
/// step and batch losses.
///
/// # Example
///
/// ```rust
/// use snake_dqn::metrics::TrainingStats;
///
/// let mut stats = TrainingStats::new(100);
///
/// stats.record_step_loss(0.8);
/// let new_record = stats.record_game(7, 230, 0.5);
///
/// assert!(new_record);
/// println!("{}", stats.format_summary());
/// ```
#[derive(Debug, Clone)]
pub struct TrainingStats {
    /// Final score of every finished game, in order
    scores: Vec<u32>,

    /// Cumulative mean score after each game
    mean_scores: Vec<f32>,

    /// Per-step TD losses (rolling window)
    step_losses: VecDeque<f32>,

    /// Episode-boundary batch losses (rolling window)
    batch_losses: VecDeque<f32>,

    /// Best score seen so far
    record: u32,

    /// Total environment steps across all games
    total_steps: usize,

    /// Window size for rolling loss averages
    window_size: usize,
}

impl TrainingStats {
    pub fn new(window_size: usize) -> Self {
        Self {
            scores: Vec::new(),
            mean_scores: Vec::new(),
            step_losses: VecDeque::with_capacity(window_size),
            batch_losses: VecDeque::with_capacity(window_size),
            record: 0,
            total_steps: 0,
            window_size,
        }
    }

    /// Record a finished game.
    ///
    /// Returns `true` if `score` strictly beats the previous record. The
    /// batch loss comes from the episode-boundary replay update.
    pub fn record_game(&mut self, score: u32, steps: usize, batch_loss: f32) -> bool {
        self.scores.push(score);
        self.total_steps += steps;

        let sum: u64 = self.scores.iter().map(|&s| s as u64).sum();
        self.mean_scores.push(sum as f32 / self.scores.len() as f32);

        Self::push_window(&mut self.batch_losses, batch_loss, self.window_size);

        if score > self.record {
            self.record = score;
            true
        } else {
            false
        }
    }

    /// Record the loss of a single-transition update.
    pub fn record_step_loss(&mut self, loss: f32) {
        Self::push_window(&mut self.step_losses, loss, self.window_size);
    }

    pub fn games_played(&self) -> usize {
        self.scores.len()
    }

    pub fn record(&self) -> u32 {
        self.record
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    /// Cumulative mean score after each game (the learning curve).
    pub fn mean_scores(&self) -> &[f32] {
        &self.mean_scores
    }

    pub fn latest_mean_score(&self) -> f32 {
        self.mean_scores.last().copied().unwrap_or(0.0)
    }

    /// Mean score over the last `window_size` games.
    pub fn recent_mean_score(&self) -> f32 {
        let tail = self.scores.len().saturating_sub(self.window_size);
        let recent = &self.scores[tail..];
        if recent.is_empty() {
            0.0
        } else {
            recent.iter().sum::<u32>() as f32 / recent.len() as f32
        }
    }

    pub fn mean_step_loss(&self) -> f32 {
        Self::mean(&self.step_losses)
    }

    pub fn mean_batch_loss(&self) -> f32 {
        Self::mean(&self.batch_losses)
    }

    /// One-line progress summary for the training log.
    ///
    /// ```rust
    /// use snake_dqn::metrics::TrainingStats;
    ///
    /// let mut stats = TrainingStats::new(100);
    /// stats.record_game(3, 120, 0.4);
    ///
    /// let summary = stats.format_summary();
    /// assert!(summary.contains("Game 1"));
    /// assert!(summary.contains("Record: 3"));
    /// ```
    pub fn format_summary(&self) -> String {
        format!(
            "Game {} | Score: {} | Record: {} | Mean: {:.2} | Recent: {:.2} | Step loss: {:.4} | Batch loss: {:.4}",
            self.games_played(),
            self.scores.last().copied().unwrap_or(0),
            self.record,
            self.latest_mean_score(),
            self.recent_mean_score(),
            self.mean_step_loss(),
            self.mean_batch_loss(),
        )
    }

    fn mean(window: &VecDeque<f32>) -> f32 {
        if window.is_empty() {
            0.0
        } else {
            window.iter().sum::<f32>() / window.len() as f32
        }
    }

    fn push_window(window: &mut VecDeque<f32>, value: f32, window_size: usize) {
        if window.len() >= window_size {
            window.pop_front();
        }
        window.push_back(value);
    }
}
