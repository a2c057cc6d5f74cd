use tracing::{debug, info, trace};

use crate::game::{Episode, RoundOutcome};
use crate::infra::EpisodeObserver;
use crate::rl::EpisodeSummary;
use crate::state::WorldState;

/// Logs episode events through `tracing`, tagged with the worker that ran them.
pub struct DefaultObserver {
    worker: usize,
}

impl DefaultObserver {
    pub fn new(worker: usize) -> Self {
        Self { worker }
    }
}

impl EpisodeObserver for DefaultObserver {
    fn on_episode_start(&mut self, index: usize, world: &WorldState) {
        debug!("[worker {}] Episode {} started", self.worker, index);
        for (i, agent) in world.agents.iter().enumerate() {
            debug!(
                "- agent {}: ({}, {}) facing {:?}",
                i, agent.position.row, agent.position.col, agent.orientation
            );
        }
        trace!("\n{}", world.draw_ascii_map());
    }

    fn on_round(&mut self, outcome: &RoundOutcome, episode: &Episode) {
        debug!(
            "[worker {}] round {}: {} / {} -> {:?}, reward {:.2}",
            self.worker,
            episode.total_moves(),
            outcome.actions[0],
            outcome.actions[1],
            outcome.statuses,
            episode.rewards()[0]
        );
        if outcome.big_box_pushed {
            debug!("[worker {}] big box pushed", self.worker);
        }
        trace!("\n{}", episode.world().draw_ascii_map());
    }

    fn on_episode_finished(&mut self, summary: &EpisodeSummary) {
        info!(
            "[worker {}] Episode {} finished: {} after {} rounds, return {:.2}",
            self.worker,
            summary.index,
            if summary.win { "win" } else { "timeout" },
            summary.rounds,
            summary.total_return
        );
    }
}
