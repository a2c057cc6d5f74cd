//! Decentralized policies: each agent sees only its own observation.

use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game::{ActionKind, GameError};

/// Maps one agent's observation to an action.
pub trait Policy: Send {
    fn act(&mut self, observation: &[f64], agent: usize) -> ActionKind;

    fn name(&self) -> &'static str;
}

/// Uniform over the four actions.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn act(&mut self, _observation: &[f64], _agent: usize) -> ActionKind {
        ActionKind::ALL[self.rng.random_range(0..ActionKind::ALL.len())]
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Always moves forward. Baseline for layouts where the agents start lined
/// up behind the big box.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardPolicy;

impl Policy for ForwardPolicy {
    fn act(&mut self, _observation: &[f64], _agent: usize) -> ActionKind {
        ActionKind::MoveForward
    }

    fn name(&self) -> &'static str {
        "forward"
    }
}

/// Policy selector for the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolicyKind {
    #[default]
    Random,
    Forward,
}

impl PolicyKind {
    pub fn build(self, seed: u64) -> Box<dyn Policy> {
        match self {
            PolicyKind::Random => Box::new(RandomPolicy::new(seed)),
            PolicyKind::Forward => Box::new(ForwardPolicy),
        }
    }
}

impl FromStr for PolicyKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(PolicyKind::Random),
            "forward" => Ok(PolicyKind::Forward),
            other => Err(GameError::UnknownPolicy(other.to_string())),
        }
    }
}
