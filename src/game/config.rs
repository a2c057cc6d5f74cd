//! Game configuration with validation and environment overrides.

use std::env;
use std::path::Path;

use tracing::warn;

use crate::infra::Orientation;
use crate::state::Layout;

use super::{GameError, NUM_AGENTS};

/// Reward magnitudes. All rewards are shared by both agents.
#[derive(Debug, Clone, PartialEq)]
pub struct RewardConfig {
    /// Paid every round. Must be negative.
    pub step_cost: f64,
    /// Paid on the round the big box lands on the goal.
    pub goal_bonus: f64,
    /// Paid per forward move that fails.
    pub bump_penalty: f64,
    /// Paid per small box that arrives on a goal cell.
    pub small_box_reward: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            step_cost: -0.1,
            goal_bonus: 100.0,
            bump_penalty: 0.0,
            small_box_reward: 0.0,
        }
    }
}

impl RewardConfig {
    /// Full reward model of the Seuken & Zilberstein box-pushing benchmark.
    pub fn reference() -> Self {
        Self {
            step_cost: -0.1,
            goal_bonus: 100.0,
            bump_penalty: -5.0,
            small_box_reward: 10.0,
        }
    }

    pub fn validate(&self, horizon: usize) -> Result<(), GameError> {
        if !(self.step_cost < 0.0) {
            return Err(GameError::InvalidRewards(format!(
                "step cost must be negative, got {}",
                self.step_cost
            )));
        }
        // Reaching the goal must beat stalling until the horizon.
        let worst_stall = -self.step_cost * horizon as f64;
        if !(self.goal_bonus > worst_stall) {
            return Err(GameError::InvalidRewards(format!(
                "goal bonus {} does not exceed {} rounds of step cost",
                self.goal_bonus, horizon
            )));
        }
        if !(self.bump_penalty <= 0.0) {
            return Err(GameError::InvalidRewards(format!(
                "bump penalty must not be positive, got {}",
                self.bump_penalty
            )));
        }
        if !(self.small_box_reward >= 0.0) {
            return Err(GameError::InvalidRewards(format!(
                "small box reward must not be negative, got {}",
                self.small_box_reward
            )));
        }
        Ok(())
    }
}

/// Everything needed to start an episode.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Maximum number of rounds.
    pub horizon: usize,
    pub layout: Layout,
    pub initial_orientations: [Orientation; NUM_AGENTS],
    /// Draw starting orientations at random instead of using the fixed ones.
    pub random_orientations: bool,
    /// Probability that a submitted action is carried out at all.
    pub action_success_prob: f64,
    /// Observation window radius. `None` covers the whole grid from any cell.
    pub view_radius: Option<usize>,
    pub rewards: RewardConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            horizon: 100,
            layout: Layout::reference(),
            initial_orientations: [Orientation::East, Orientation::West],
            random_orientations: false,
            action_success_prob: 1.0,
            view_radius: Some(1),
            rewards: RewardConfig::default(),
        }
    }
}

/// Parsed value of `key`. Unparsable values are logged and ignored.
pub(crate) fn get_env_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}={}: not a valid value", key, raw);
            None
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.horizon == 0 {
            return Err(GameError::InvalidHorizon(self.horizon));
        }
        let p = self.action_success_prob;
        if !(p > 0.0 && p <= 1.0) {
            return Err(GameError::InvalidProbability(p));
        }
        self.rewards.validate(self.horizon)?;
        let map = &self.layout.map;
        let max_radius = map.rows.max(map.cols) as usize;
        if let Some(radius) = self.view_radius.filter(|r| *r > max_radius) {
            return Err(GameError::InvalidViewRadius {
                radius,
                max: max_radius,
            });
        }
        self.layout.validate()?;
        self.layout.check_goal_reachable()
    }

    /// Defaults overridden by `BOXPUSH_*` environment variables.
    pub fn from_env() -> Result<Self, GameError> {
        let mut config = Self::default();

        if let Some(horizon) = get_env_var::<usize>("BOXPUSH_HORIZON") {
            config.horizon = horizon;
        }
        if let Ok(radius) = env::var("BOXPUSH_VIEW_RADIUS") {
            config.view_radius = match radius.as_str() {
                "full" => None,
                _ => match radius.parse::<usize>() {
                    Ok(r) => Some(r),
                    Err(_) => {
                        warn!("Ignoring BOXPUSH_VIEW_RADIUS={}", radius);
                        config.view_radius
                    }
                },
            };
        }
        if let Some(p) = get_env_var::<f64>("BOXPUSH_SUCCESS_PROB") {
            config.action_success_prob = p;
        }
        if let Some(random) = get_env_var::<bool>("BOXPUSH_RANDOM_ORIENTATION") {
            config.random_orientations = random;
        }
        if let Ok(rewards) = env::var("BOXPUSH_REWARDS") {
            config.rewards = match rewards.as_str() {
                "reference" => RewardConfig::reference(),
                "default" => RewardConfig::default(),
                other => {
                    warn!("Unknown BOXPUSH_REWARDS={}, using default", other);
                    RewardConfig::default()
                }
            };
        }
        if let Ok(path) = env::var("BOXPUSH_LAYOUT") {
            config.layout = Self::load_layout(&path)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn load_layout(path: impl AsRef<Path>) -> Result<Layout, GameError> {
        let text = std::fs::read_to_string(path)?;
        Layout::parse(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::Position;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert_eq!(config.horizon, 100);
        assert!(config.validate().is_ok());
        assert!(RewardConfig::reference().validate(100).is_ok());
    }

    #[test]
    fn test_rejects_zero_horizon() {
        let config = GameConfig {
            horizon: 0,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(GameError::InvalidHorizon(0))));
    }

    #[test]
    fn test_goal_bonus_must_dominate_step_costs() {
        let rewards = RewardConfig {
            step_cost: -1.0,
            goal_bonus: 100.0,
            ..RewardConfig::default()
        };
        assert!(rewards.validate(99).is_ok());
        assert!(matches!(
            rewards.validate(100),
            Err(GameError::InvalidRewards(_))
        ));

        let free_steps = RewardConfig {
            step_cost: 0.0,
            ..RewardConfig::default()
        };
        assert!(free_steps.validate(10).is_err());
    }

    #[test]
    fn test_rejects_bad_probability() {
        for p in [0.0, -0.5, 1.5, f64::NAN] {
            let config = GameConfig {
                action_success_prob: p,
                ..GameConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(GameError::InvalidProbability(_))
            ));
        }
    }

    #[test]
    fn test_rejects_unreachable_goal() {
        let config = GameConfig {
            layout: Layout::parse("GGGG\n####\n.BB.\n0..1").unwrap(),
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(GameError::UnreachableGoal)));
    }

    #[test]
    fn test_rejects_agents_sharing_a_start() {
        let mut layout = Layout::parse("GGG\n.BB\n.01").unwrap();
        layout.starts = [Position::new(2, 1), Position::new(2, 1)];
        let config = GameConfig {
            layout,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(GameError::InvalidLayout(_))));
    }

    #[test]
    fn test_view_radius_is_capped_by_grid() {
        let config = GameConfig {
            view_radius: Some(8),
            ..GameConfig::default()
        };
        assert!(config.validate().is_ok());

        let config = GameConfig {
            view_radius: Some(usize::MAX),
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GameError::InvalidViewRadius { max: 8, .. })
        ));
    }

    #[test]
    fn test_env_var_helper_ignores_bad_values() {
        // Keys are unique to this test; nothing else reads them.
        unsafe {
            env::set_var("BOXPUSH_TEST_HELPER_GOOD", "42");
            env::set_var("BOXPUSH_TEST_HELPER_BAD", "forty-two");
        }
        assert_eq!(get_env_var::<usize>("BOXPUSH_TEST_HELPER_GOOD"), Some(42));
        assert_eq!(get_env_var::<usize>("BOXPUSH_TEST_HELPER_BAD"), None);
        assert_eq!(get_env_var::<usize>("BOXPUSH_TEST_HELPER_UNSET"), None);
    }

    #[test]
    fn test_load_layout_missing_file() {
        assert!(matches!(
            GameConfig::load_layout("/nonexistent/boxpush/layout.txt"),
            Err(GameError::Io(_))
        ));
    }
}
