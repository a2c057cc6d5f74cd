use crate::game::{Episode, RoundOutcome};
use crate::rl::EpisodeSummary;
use crate::state::WorldState;

/// Trait for observing episode events during rollouts
pub trait EpisodeObserver {
    /// Called before the first round of an episode
    fn on_episode_start(&mut self, index: usize, world: &WorldState);

    /// Called after every resolved round
    fn on_round(&mut self, _outcome: &RoundOutcome, _episode: &Episode) {
        // Default implementation does nothing
    }

    /// Called once the episode is terminal
    fn on_episode_finished(&mut self, summary: &EpisodeSummary);
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl EpisodeObserver for NullObserver {
    fn on_episode_start(&mut self, _index: usize, _world: &WorldState) {}

    fn on_episode_finished(&mut self, _summary: &EpisodeSummary) {}
}
