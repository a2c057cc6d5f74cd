//! Error types for the box-pushing game.

use thiserror::Error;

use crate::infra::Position;

/// Contract violations and configuration errors.
///
/// Blocked moves are not errors; they surface as `ActionStatus::Fail`.
#[derive(Debug, Error)]
pub enum GameError {
    /// Agent index outside `0..NUM_AGENTS`.
    #[error("Invalid agent index {agent}")]
    InvalidAgent { agent: usize },

    /// Action index outside the four defined kinds.
    #[error("Invalid action {action}")]
    InvalidAction { action: usize },

    /// Coordinate outside the grid.
    #[error("Position ({}, {}) out of range", pos.row, pos.col)]
    OutOfRange { pos: Position },

    /// Episode has already ended.
    #[error("Episode is in terminal state")]
    TerminalState,

    /// Operation not allowed in the current phase of the round.
    #[error("Expected {expected} phase")]
    WrongPhase { expected: &'static str },

    /// Chance outcome not offered at the current chance node.
    #[error("Chance outcome {outcome} is not available")]
    InvalidChanceOutcome { outcome: usize },

    /// Observation buffer has the wrong length.
    #[error("Observation buffer holds {actual} values, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("Horizon must be positive, got {0}")]
    InvalidHorizon(usize),

    #[error("Invalid reward configuration: {0}")]
    InvalidRewards(String),

    #[error("Probability must lie in (0, 1], got {0}")]
    InvalidProbability(f64),

    /// Observation window larger than the grid.
    #[error("View radius {radius} exceeds the grid limit {max}")]
    InvalidViewRadius { radius: usize, max: usize },

    #[error("Unknown policy '{0}'")]
    UnknownPolicy(String),

    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    /// The big box can never be pushed onto the goal.
    #[error("Goal is unreachable for the big box")]
    UnreachableGoal,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A rollout worker panicked or was cancelled.
    #[error("Worker error: {0}")]
    Worker(String),
}
