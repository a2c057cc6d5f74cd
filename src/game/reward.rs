use super::config::RewardConfig;
use super::resolver::RoundOutcome;

/// Turns a resolved round into the shared team reward.
#[derive(Debug, Clone)]
pub struct RewardModel {
    config: RewardConfig,
}

impl RewardModel {
    pub fn new(config: RewardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    pub fn round_reward(&self, outcome: &RoundOutcome) -> f64 {
        let mut reward = self.config.step_cost;
        reward += self.config.bump_penalty * outcome.failed_moves() as f64;
        reward += self.config.small_box_reward * outcome.small_boxes_on_goal as f64;
        if outcome.big_box_on_goal {
            reward += self.config.goal_bonus;
        }
        reward
    }

    /// Lowest and highest return reachable within `horizon` rounds. The low
    /// end bumps twice every round until the horizon; the high end scores
    /// every small box and wins after a single round's step cost.
    pub fn utility_bounds(&self, horizon: usize, small_boxes: usize) -> (f64, f64) {
        let h = horizon as f64;
        let min = h * (self.config.step_cost + 2.0 * self.config.bump_penalty);
        let max = self.config.step_cost
            + self.config.goal_bonus
            + small_boxes as f64 * self.config.small_box_reward;
        (min, max)
    }
}
