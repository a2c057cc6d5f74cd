//! RL Environment - gym-like interface for training

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::game::{
    ActionStatus, Episode, GameConfig, GameError, NUM_ACTIONS, NUM_AGENTS,
};

/// Observation returned by the environment
#[derive(Debug, Clone)]
pub struct Observation {
    /// Per-agent egocentric observations [num_agents, obs_size]
    pub local_obs: Vec<Vec<f64>>,
    /// Action masks [num_agents, NUM_ACTIONS]; every action may be submitted
    pub action_masks: Vec<Vec<f64>>,
}

/// Step result from the environment
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Next observation
    pub observation: Observation,
    /// Shared team reward
    pub reward: f64,
    /// Episode done
    pub done: bool,
    /// Ended by the horizon rather than by reaching the goal
    pub truncated: bool,
    /// Additional info
    pub info: StepInfo,
}

/// Additional information from a step
#[derive(Debug, Clone, Default)]
pub struct StepInfo {
    /// Big box reached the goal
    pub win: bool,
    /// Rounds played this episode
    pub steps: usize,
    /// Outcome of each agent's action
    pub statuses: [ActionStatus; NUM_AGENTS],
    /// Agent whose move was resolved first
    pub initiative: usize,
    /// Return accumulated so far
    pub episode_return: f64,
}

/// Two-agent environment that samples its own chance outcomes
pub struct BoxPushEnv {
    config: GameConfig,
    episode: Episode,
    rng: StdRng,
}

impl BoxPushEnv {
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, GameError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let episode = Episode::with_rng(config.clone(), &mut rng)?;
        Ok(Self {
            config,
            episode,
            rng,
        })
    }

    /// Start a fresh episode and return its first observation
    pub fn reset(&mut self) -> Result<Observation, GameError> {
        self.episode = Episode::with_rng(self.config.clone(), &mut self.rng)?;
        self.observation()
    }

    pub fn observation(&self) -> Result<Observation, GameError> {
        let local_obs = (0..NUM_AGENTS)
            .map(|agent| self.episode.information_state_vector(agent))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Observation {
            local_obs,
            action_masks: vec![vec![1.0; NUM_ACTIONS]; NUM_AGENTS],
        })
    }

    /// Take a step with one action index per agent
    pub fn step(&mut self, actions: [usize; NUM_AGENTS]) -> Result<StepResult, GameError> {
        self.episode.apply_action_indices(actions)?;
        let outcome = self.episode.sample_chance(&mut self.rng)?;

        let win = self.episode.win();
        let done = self.episode.is_terminal();
        let info = StepInfo {
            win,
            steps: self.episode.total_moves(),
            statuses: outcome.statuses,
            initiative: outcome.initiative,
            episode_return: self.episode.returns()[0],
        };

        Ok(StepResult {
            observation: self.observation()?,
            reward: self.episode.rewards()[0],
            done,
            truncated: done && !win,
            info,
        })
    }

    pub fn num_agents(&self) -> usize {
        NUM_AGENTS
    }

    pub fn obs_size(&self) -> usize {
        self.episode.information_state_size()
    }

    /// Current episode (for debugging/observers)
    pub fn episode(&self) -> &Episode {
        &self.episode
    }
}

/// Batch of independent environments for parallel rollout collection
pub struct BatchEnv {
    envs: Vec<BoxPushEnv>,
}

impl BatchEnv {
    pub fn new(envs: Vec<BoxPushEnv>) -> Self {
        Self { envs }
    }

    /// One env per seed, all sharing a configuration
    pub fn from_seeds(config: &GameConfig, seeds: &[u64]) -> Result<Self, GameError> {
        let envs = seeds
            .iter()
            .map(|seed| BoxPushEnv::new(config.clone(), *seed))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { envs })
    }

    /// Reset all environments
    pub fn reset_all(&mut self) -> Result<Vec<Observation>, GameError> {
        self.envs.iter_mut().map(|e| e.reset()).collect()
    }

    /// Step all environments
    pub fn step_all(
        &mut self,
        actions: &[[usize; NUM_AGENTS]],
    ) -> Result<Vec<StepResult>, GameError> {
        self.envs
            .iter_mut()
            .zip(actions.iter())
            .map(|(env, acts)| env.step(*acts))
            .collect()
    }

    /// Get batch size
    pub fn batch_size(&self) -> usize {
        self.envs.len()
    }

    pub fn envs(&self) -> &[BoxPushEnv] {
        &self.envs
    }
}
