//! Episode metrics for rollouts and evaluation

use std::collections::VecDeque;

/// Moving average calculator
#[derive(Debug, Clone)]
pub struct MovingAverage {
    values: VecDeque<f64>,
    window_size: usize,
    sum: f64,
}

impl MovingAverage {
    pub fn new(window_size: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(window_size),
            window_size,
            sum: 0.0,
        }
    }

    pub fn push(&mut self, value: f64) {
        if self.values.len() >= self.window_size {
            if let Some(old) = self.values.pop_front() {
                self.sum -= old;
            }
        }
        self.values.push_back(value);
        self.sum += value;
    }

    pub fn average(&self) -> f64 {
        if self.values.is_empty() {
            0.0
        } else {
            self.sum / self.values.len() as f64
        }
    }

    /// Pushes every value held by `other`, oldest first.
    pub fn extend(&mut self, other: &MovingAverage) {
        for value in &other.values {
            self.push(*value);
        }
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for MovingAverage {
    fn default() -> Self {
        Self::new(100)
    }
}

/// Result of one finished episode
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeSummary {
    pub index: usize,
    pub win: bool,
    pub rounds: usize,
    pub total_return: f64,
}

/// Aggregated results over many episodes
#[derive(Debug, Clone, Default)]
pub struct EvaluationMetrics {
    /// Number of episodes
    pub num_episodes: usize,
    /// Episodes that ended with the big box on the goal
    pub num_wins: usize,
    /// Sum of returns across all episodes
    pub total_return: f64,
    /// Sum of rounds across all episodes
    pub total_rounds: usize,
    /// Rounds of winning episodes only
    pub win_rounds: usize,
    /// Returns of the most recent episodes
    pub recent_returns: MovingAverage,
}

impl EvaluationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_episode(&mut self, summary: &EpisodeSummary) {
        self.num_episodes += 1;
        self.total_return += summary.total_return;
        self.total_rounds += summary.rounds;
        if summary.win {
            self.num_wins += 1;
            self.win_rounds += summary.rounds;
        }
        self.recent_returns.push(summary.total_return);
    }

    /// Folds another worker's totals into this one. `other`'s recent returns
    /// are appended after this side's, so the window ends with `other`'s.
    pub fn merge(&mut self, other: &EvaluationMetrics) {
        self.num_episodes += other.num_episodes;
        self.num_wins += other.num_wins;
        self.total_return += other.total_return;
        self.total_rounds += other.total_rounds;
        self.win_rounds += other.win_rounds;
        self.recent_returns.extend(&other.recent_returns);
    }

    pub fn win_rate(&self) -> f64 {
        if self.num_episodes > 0 {
            self.num_wins as f64 / self.num_episodes as f64
        } else {
            0.0
        }
    }

    pub fn avg_return(&self) -> f64 {
        if self.num_episodes > 0 {
            self.total_return / self.num_episodes as f64
        } else {
            0.0
        }
    }

    pub fn avg_rounds(&self) -> f64 {
        if self.num_episodes > 0 {
            self.total_rounds as f64 / self.num_episodes as f64
        } else {
            0.0
        }
    }

    /// Average rounds needed by winning episodes
    pub fn avg_rounds_to_win(&self) -> Option<f64> {
        (self.num_wins > 0).then(|| self.win_rounds as f64 / self.num_wins as f64)
    }

    pub fn log_summary(&self) {
        tracing::info!("=== Evaluation Summary ===");
        tracing::info!("Episodes: {}", self.num_episodes);
        tracing::info!("Win Rate: {:.1}%", self.win_rate() * 100.0);
        tracing::info!("Avg Return: {:.2}", self.avg_return());
        if !self.recent_returns.is_empty() {
            tracing::info!(
                "Recent Avg Return (last {}): {:.2}",
                self.recent_returns.len(),
                self.recent_returns.average()
            );
        }
        tracing::info!("Avg Rounds: {:.1}", self.avg_rounds());
        if let Some(rounds) = self.avg_rounds_to_win() {
            tracing::info!("Avg Rounds To Win: {:.1}", rounds);
        }
    }
}
