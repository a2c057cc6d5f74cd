//! Simultaneous-move cooperative box pushing.
//!
//! ```text
//!  actions ──▶ chance (slips, initiative) ──▶ resolver ──▶ reward ──▶ encoder
//! ```
//!
//! [`Episode`] is the entry point for a host: it owns the world, runs the
//! chance nodes, and exposes returns, terminal status and observations.

mod action;
pub mod chance;
mod config;
mod episode;
mod error;
mod resolver;
mod reward;

pub use action::{ActionKind, ActionStatus, NUM_ACTIONS, NUM_AGENTS};
pub(crate) use action::check_agent;
pub use chance::{ChanceOutcome, MAX_CHANCE_OUTCOMES};
pub use config::{GameConfig, RewardConfig};
pub(crate) use config::get_env_var;
pub use episode::{Episode, Phase};
pub use error::GameError;
pub use resolver::{RoundOutcome, resolve_round};
pub use reward::RewardModel;
