//! Chance nodes: per-action slips, the per-round initiative draw, and the
//! episode-start orientation draw.

use rand::Rng;

use crate::infra::Orientation;

use super::{GameError, NUM_AGENTS};

/// Number of distinct chance outcome ids.
pub const MAX_CHANCE_OUTCOMES: usize = 4;

/// One outcome of a chance node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChanceOutcome {
    /// The pending agent's action goes through.
    Succeed,
    /// The pending agent's action fails without effect.
    Slip,
    /// This agent's move is resolved first.
    Initiative(usize),
}

impl ChanceOutcome {
    pub fn id(self) -> usize {
        match self {
            ChanceOutcome::Succeed => 0,
            ChanceOutcome::Slip => 1,
            ChanceOutcome::Initiative(agent) => 2 + agent,
        }
    }

    pub fn from_id(id: usize) -> Result<Self, GameError> {
        match id {
            0 => Ok(ChanceOutcome::Succeed),
            1 => Ok(ChanceOutcome::Slip),
            2 | 3 => Ok(ChanceOutcome::Initiative(id - 2)),
            _ => Err(GameError::InvalidChanceOutcome { outcome: id }),
        }
    }
}

/// Uniform distribution over which agent holds the initiative.
pub fn initiative_outcomes() -> Vec<(ChanceOutcome, f64)> {
    let p = 1.0 / NUM_AGENTS as f64;
    (0..NUM_AGENTS)
        .map(|agent| (ChanceOutcome::Initiative(agent), p))
        .collect()
}

/// Success/slip distribution for one agent's action.
pub fn slip_outcomes(success_prob: f64) -> Vec<(ChanceOutcome, f64)> {
    vec![
        (ChanceOutcome::Succeed, success_prob),
        (ChanceOutcome::Slip, 1.0 - success_prob),
    ]
}

/// Draws one outcome from a distribution whose probabilities sum to one.
pub fn sample<R: Rng>(outcomes: &[(ChanceOutcome, f64)], rng: &mut R) -> ChanceOutcome {
    let mut r: f64 = rng.random();
    for (outcome, p) in outcomes {
        if r < *p {
            return *outcome;
        }
        r -= p;
    }
    // Rounding left a sliver of mass past the end.
    outcomes
        .iter()
        .rev()
        .find(|(_, p)| *p > 0.0)
        .map(|(outcome, _)| *outcome)
        .unwrap_or(ChanceOutcome::Initiative(0))
}

pub fn random_orientations<R: Rng>(rng: &mut R) -> [Orientation; NUM_AGENTS] {
    [
        Orientation::from_index(rng.random_range(0..4)),
        Orientation::from_index(rng.random_range(0..4)),
    ]
}
