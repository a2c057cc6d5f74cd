//! Episode state and the interface exposed to a host framework.

use rand::Rng;
use tracing::debug;

use crate::rl::StateEncoder;
use crate::state::{Cell, WorldState};

use super::action::{ActionKind, ActionStatus, NUM_AGENTS, check_agent};
use super::chance::{self, ChanceOutcome};
use super::config::GameConfig;
use super::resolver::{RoundOutcome, resolve_round};
use super::reward::RewardModel;
use super::GameError;

/// Where the episode stands within the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for both agents' actions.
    Decision,
    /// Actions submitted, waiting for chance outcomes.
    Chance,
    Terminal,
}

#[derive(Debug, Clone)]
struct PendingRound {
    actions: [ActionKind; NUM_AGENTS],
    slipped: [Option<bool>; NUM_AGENTS],
}

/// One simulated episode. Every episode owns its world outright.
#[derive(Debug, Clone)]
pub struct Episode {
    config: GameConfig,
    rewards: RewardModel,
    encoder: StateEncoder,
    world: WorldState,
    total_moves: usize,
    total_reward: f64,
    last_reward: f64,
    initiative: Option<usize>,
    win: bool,
    statuses: [ActionStatus; NUM_AGENTS],
    pending: Option<PendingRound>,
    last_outcome: Option<RoundOutcome>,
}

impl Episode {
    /// Starts an episode, drawing random orientations from the thread RNG when
    /// the configuration asks for them.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        Self::with_rng(config, &mut rand::rng())
    }

    pub fn with_rng<R: Rng>(config: GameConfig, rng: &mut R) -> Result<Self, GameError> {
        config.validate()?;

        let orientations = if config.random_orientations {
            chance::random_orientations(rng)
        } else {
            config.initial_orientations
        };
        let world = WorldState::new(&config.layout, orientations);
        debug!(
            "New episode: horizon {}, orientations {:?}",
            config.horizon, orientations
        );

        Ok(Self {
            rewards: RewardModel::new(config.rewards.clone()),
            encoder: StateEncoder::from_config(&config),
            config,
            world,
            total_moves: 0,
            total_reward: 0.0,
            last_reward: 0.0,
            initiative: None,
            win: false,
            statuses: [ActionStatus::Unresolved; NUM_AGENTS],
            pending: None,
            last_outcome: None,
        })
    }

    pub fn phase(&self) -> Phase {
        if self.is_terminal() {
            Phase::Terminal
        } else if self.pending.is_some() {
            Phase::Chance
        } else {
            Phase::Decision
        }
    }

    fn expect_decision(&self) -> Result<(), GameError> {
        match self.phase() {
            Phase::Decision => Ok(()),
            Phase::Terminal => Err(GameError::TerminalState),
            Phase::Chance => Err(GameError::WrongPhase {
                expected: "decision",
            }),
        }
    }

    /// Plays a full round with a known initiative and no slips.
    pub fn apply_round(
        &mut self,
        actions: [ActionKind; NUM_AGENTS],
        initiative: usize,
    ) -> Result<RoundOutcome, GameError> {
        self.expect_decision()?;
        check_agent(initiative)?;
        self.statuses = [ActionStatus::Unresolved; NUM_AGENTS];
        let outcome = resolve_round(&mut self.world, actions, [false; NUM_AGENTS], initiative)?;
        self.finish_round(outcome.clone());
        Ok(outcome)
    }

    /// Submits both actions; the round resolves once `apply_chance` has
    /// supplied every pending chance outcome.
    pub fn apply_actions(&mut self, actions: [ActionKind; NUM_AGENTS]) -> Result<(), GameError> {
        self.expect_decision()?;
        self.statuses = [ActionStatus::Unresolved; NUM_AGENTS];
        let slipped = if self.config.action_success_prob < 1.0 {
            [None; NUM_AGENTS]
        } else {
            [Some(false); NUM_AGENTS]
        };
        self.pending = Some(PendingRound { actions, slipped });
        Ok(())
    }

    /// Like `apply_actions`, taking raw action indices.
    pub fn apply_action_indices(&mut self, actions: [usize; NUM_AGENTS]) -> Result<(), GameError> {
        let kinds = [
            ActionKind::try_from(actions[0])?,
            ActionKind::try_from(actions[1])?,
        ];
        self.apply_actions(kinds)
    }

    /// Distribution of the chance node the episode is waiting on.
    pub fn chance_outcomes(&self) -> Result<Vec<(ChanceOutcome, f64)>, GameError> {
        let pending = self.pending.as_ref().ok_or(GameError::WrongPhase {
            expected: "chance",
        })?;
        if pending.slipped.iter().any(Option::is_none) {
            Ok(chance::slip_outcomes(self.config.action_success_prob))
        } else {
            Ok(chance::initiative_outcomes())
        }
    }

    /// Applies one chance outcome. Returns the round outcome once the round
    /// has been resolved.
    pub fn apply_chance(
        &mut self,
        outcome: ChanceOutcome,
    ) -> Result<Option<RoundOutcome>, GameError> {
        let offered = self.chance_outcomes()?;
        if !offered.iter().any(|(o, p)| *o == outcome && *p > 0.0) {
            return Err(GameError::InvalidChanceOutcome {
                outcome: outcome.id(),
            });
        }
        let Some(pending) = self.pending.as_mut() else {
            return Err(GameError::WrongPhase { expected: "chance" });
        };

        match outcome {
            ChanceOutcome::Succeed | ChanceOutcome::Slip => {
                if let Some(slot) = pending.slipped.iter_mut().find(|s| s.is_none()) {
                    *slot = Some(outcome == ChanceOutcome::Slip);
                }
                Ok(None)
            }
            ChanceOutcome::Initiative(initiative) => {
                let actions = pending.actions;
                let slipped = pending.slipped.map(|s| s.unwrap_or(false));
                self.pending = None;
                let round = resolve_round(&mut self.world, actions, slipped, initiative)?;
                self.finish_round(round.clone());
                Ok(Some(round))
            }
        }
    }

    /// Convenience for hosts that sample chance themselves: draws every
    /// pending chance outcome from `rng`.
    pub fn sample_chance<R: Rng>(&mut self, rng: &mut R) -> Result<RoundOutcome, GameError> {
        loop {
            let outcomes = self.chance_outcomes()?;
            let outcome = chance::sample(&outcomes, rng);
            if let Some(round) = self.apply_chance(outcome)? {
                return Ok(round);
            }
        }
    }

    fn finish_round(&mut self, outcome: RoundOutcome) {
        let reward = self.rewards.round_reward(&outcome);
        self.total_moves += 1;
        self.last_reward = reward;
        self.total_reward += reward;
        self.initiative = Some(outcome.initiative);
        self.statuses = outcome.statuses;
        if outcome.big_box_on_goal {
            self.win = true;
            debug!(
                "Big box reached the goal after {} rounds, return {:.2}",
                self.total_moves, self.total_reward
            );
        }
        debug!(
            "Round {}: {:?} -> {:?}, initiative {}, reward {:.2}",
            self.total_moves, outcome.actions, outcome.statuses, outcome.initiative, reward
        );
        self.last_outcome = Some(outcome);
    }

    pub fn is_terminal(&self) -> bool {
        self.win || self.total_moves >= self.config.horizon
    }

    /// Cumulative return, identical for both agents.
    pub fn returns(&self) -> [f64; NUM_AGENTS] {
        [self.total_reward; NUM_AGENTS]
    }

    /// Reward of the most recent round, identical for both agents.
    pub fn rewards(&self) -> [f64; NUM_AGENTS] {
        [self.last_reward; NUM_AGENTS]
    }

    /// Every action may always be submitted; only its success varies.
    pub fn legal_actions(&self, agent: usize) -> Result<Vec<ActionKind>, GameError> {
        check_agent(agent)?;
        Ok(ActionKind::ALL.to_vec())
    }

    pub fn information_state_size(&self) -> usize {
        self.encoder.size()
    }

    pub fn information_state_vector(&self, agent: usize) -> Result<Vec<f64>, GameError> {
        self.encoder.encode(&self.world, agent)
    }

    pub fn write_information_state(
        &self,
        agent: usize,
        values: &mut [f64],
    ) -> Result<(), GameError> {
        self.encoder.encode_into(&self.world, agent, values)
    }

    /// Lowest and highest return reachable in this configuration.
    pub fn utility_bounds(&self) -> (f64, f64) {
        let small_boxes = self.config.layout.map.positions_of(Cell::SmallBox).len();
        self.rewards
            .utility_bounds(self.config.horizon, small_boxes)
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn win(&self) -> bool {
        self.win
    }

    pub fn total_moves(&self) -> usize {
        self.total_moves
    }

    pub fn horizon(&self) -> usize {
        self.config.horizon
    }

    /// Initiative drawn for the most recent round.
    pub fn initiative(&self) -> Option<usize> {
        self.initiative
    }

    pub fn action_statuses(&self) -> [ActionStatus; NUM_AGENTS] {
        self.statuses
    }

    pub fn last_outcome(&self) -> Option<&RoundOutcome> {
        self.last_outcome.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{Orientation, Position};
    use crate::game::RewardConfig;
    use crate::state::Layout;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use ActionKind::{MoveForward, Stay, TurnLeft};

    fn three_by_three() -> GameConfig {
        // Big box centred on a 3x3 grid with the goal row directly above it.
        GameConfig {
            horizon: 10,
            layout: Layout::parse("GGG\n.BB\n.01").unwrap(),
            initial_orientations: [Orientation::North, Orientation::North],
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_push_to_goal_wins_in_one_round() {
        let config = three_by_three();
        let rewards = config.rewards.clone();
        let mut episode = Episode::new(config).unwrap();

        let mut rounds = 0;
        while !episode.win() {
            assert!(rounds < 2, "should win within two rounds");
            episode.apply_round([MoveForward, MoveForward], rounds % 2).unwrap();
            rounds += 1;
        }

        assert!(episode.is_terminal());
        assert_eq!(episode.phase(), Phase::Terminal);
        let expected = rewards.step_cost * rounds as f64 + rewards.goal_bonus;
        assert!((episode.returns()[0] - expected).abs() < 1e-9);
        assert_eq!(episode.returns()[0], episode.returns()[1]);
        assert_eq!(episode.rewards()[0], episode.rewards()[1]);

        // No further rounds, so no further reward.
        assert!(matches!(
            episode.apply_round([MoveForward, MoveForward], 0),
            Err(GameError::TerminalState)
        ));
        assert!((episode.returns()[0] - expected).abs() < 1e-9);
    }

    #[test]
    fn test_horizon_timeout() {
        let config = GameConfig {
            horizon: 5,
            ..GameConfig::default()
        };
        let mut episode = Episode::new(config).unwrap();
        for round in 0..5 {
            assert!(!episode.is_terminal());
            episode.apply_round([Stay, TurnLeft], round % 2).unwrap();
        }
        assert!(episode.is_terminal());
        assert!(!episode.win());
        assert!((episode.returns()[0] + 0.5).abs() < 1e-9);
        assert!((episode.rewards()[0] + 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_observation_length_is_stable() {
        let mut episode = Episode::new(GameConfig::default()).unwrap();
        let size = episode.information_state_size();
        let mut rng = StdRng::seed_from_u64(3);
        while !episode.is_terminal() {
            for agent in 0..NUM_AGENTS {
                assert_eq!(episode.information_state_vector(agent).unwrap().len(), size);
            }
            let actions = [
                ActionKind::ALL[rng.random_range(0..4)],
                ActionKind::ALL[rng.random_range(0..4)],
            ];
            episode.apply_round(actions, rng.random_range(0..2)).unwrap();
        }
        assert_eq!(episode.information_state_vector(1).unwrap().len(), size);
    }

    #[test]
    fn test_observation_is_pure() {
        let episode = Episode::new(GameConfig::default()).unwrap();
        let before = episode.world().clone();
        let first = episode.information_state_vector(0).unwrap();
        let mut buf = vec![0.0; episode.information_state_size()];
        episode.write_information_state(0, &mut buf).unwrap();
        assert_eq!(first, buf);
        assert_eq!(episode.world(), &before);
    }

    #[test]
    fn test_staged_chance_round() {
        let mut episode = Episode::new(three_by_three()).unwrap();
        assert_eq!(episode.phase(), Phase::Decision);
        assert!(episode.chance_outcomes().is_err());

        episode.apply_actions([MoveForward, MoveForward]).unwrap();
        assert_eq!(episode.phase(), Phase::Chance);
        assert_eq!(episode.action_statuses(), [ActionStatus::Unresolved; 2]);
        assert!(matches!(
            episode.apply_actions([Stay, Stay]),
            Err(GameError::WrongPhase { .. })
        ));

        let outcomes = episode.chance_outcomes().unwrap();
        assert_eq!(outcomes.len(), 2);
        assert!(matches!(
            episode.apply_chance(ChanceOutcome::Slip),
            Err(GameError::InvalidChanceOutcome { outcome: 1 })
        ));

        let round = episode
            .apply_chance(ChanceOutcome::Initiative(1))
            .unwrap()
            .unwrap();
        assert_eq!(round.initiative, 1);
        assert_eq!(episode.initiative(), Some(1));
        assert!(episode.win());
    }

    #[test]
    fn test_slip_stage_precedes_initiative() {
        let config = GameConfig {
            action_success_prob: 0.9,
            ..three_by_three()
        };
        let mut episode = Episode::new(config).unwrap();
        episode.apply_action_indices([2, 2]).unwrap();

        let outcomes = episode.chance_outcomes().unwrap();
        assert_eq!(outcomes[0], (ChanceOutcome::Succeed, 0.9));
        assert!(episode.apply_chance(ChanceOutcome::Slip).unwrap().is_none());
        assert!(episode.apply_chance(ChanceOutcome::Succeed).unwrap().is_none());
        assert_eq!(episode.chance_outcomes().unwrap(), chance::initiative_outcomes());

        let round = episode
            .apply_chance(ChanceOutcome::Initiative(0))
            .unwrap()
            .unwrap();
        // Agent 0 slipped, so agent 1 tried the big box alone.
        assert_eq!(round.statuses, [ActionStatus::Fail, ActionStatus::Fail]);
        assert!(!episode.win());
        assert_eq!(episode.world().agents[1].position, Position::new(2, 2));
    }

    #[test]
    fn test_sample_chance_resolves_round() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut episode = Episode::with_rng(three_by_three(), &mut rng).unwrap();
        episode.apply_actions([Stay, Stay]).unwrap();
        let round = episode.sample_chance(&mut rng).unwrap();
        assert_eq!(round.statuses, [ActionStatus::Success; 2]);
        assert_eq!(episode.total_moves(), 1);
        assert_eq!(episode.phase(), Phase::Decision);
    }

    #[test]
    fn test_contract_violations() {
        let mut episode = Episode::new(GameConfig::default()).unwrap();
        assert!(matches!(
            episode.legal_actions(2),
            Err(GameError::InvalidAgent { agent: 2 })
        ));
        assert_eq!(episode.legal_actions(0).unwrap().len(), 4);
        assert!(matches!(
            episode.apply_action_indices([0, 9]),
            Err(GameError::InvalidAction { action: 9 })
        ));
        assert!(matches!(
            episode.apply_round([Stay, Stay], 5),
            Err(GameError::InvalidAgent { agent: 5 })
        ));
        assert!(episode.information_state_vector(3).is_err());
        assert_eq!(episode.total_moves(), 0);
    }

    #[test]
    fn test_configuration_errors_surface_at_construction() {
        let config = GameConfig {
            horizon: 0,
            ..GameConfig::default()
        };
        assert!(matches!(Episode::new(config), Err(GameError::InvalidHorizon(0))));
    }

    #[test]
    fn test_random_orientations_are_seeded() {
        let config = GameConfig {
            random_orientations: true,
            ..GameConfig::default()
        };
        let a = Episode::with_rng(config.clone(), &mut StdRng::seed_from_u64(5)).unwrap();
        let b = Episode::with_rng(config, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(a.world(), b.world());
    }

    #[test]
    fn test_utility_bounds() {
        let episode = Episode::new(GameConfig::default()).unwrap();
        let (min, max) = episode.utility_bounds();
        assert!(min < 0.0);
        assert!((max - 99.9).abs() < 1e-9);
    }

    #[test]
    fn test_one_round_win_reaches_max_utility() {
        let mut episode = Episode::new(three_by_three()).unwrap();
        let (min, max) = episode.utility_bounds();
        episode.apply_round([MoveForward, MoveForward], 0).unwrap();
        assert!(episode.win());
        let achieved = episode.returns()[0];
        assert!(achieved >= min);
        assert!(achieved <= max + 1e-9);
        assert!((achieved - max).abs() < 1e-9);
    }

    #[test]
    fn test_slipped_move_is_not_a_bump() {
        let config = GameConfig {
            action_success_prob: 0.9,
            rewards: RewardConfig::reference(),
            // Agent 0 faces open floor to the west.
            initial_orientations: [Orientation::West, Orientation::North],
            ..three_by_three()
        };
        let mut episode = Episode::new(config).unwrap();
        episode.apply_actions([MoveForward, Stay]).unwrap();
        episode.apply_chance(ChanceOutcome::Slip).unwrap();
        episode.apply_chance(ChanceOutcome::Succeed).unwrap();
        let round = episode
            .apply_chance(ChanceOutcome::Initiative(0))
            .unwrap()
            .unwrap();

        assert_eq!(round.statuses, [ActionStatus::Fail, ActionStatus::Success]);
        assert_eq!(round.failed_moves(), 0);
        assert!((episode.rewards()[0] + 0.1).abs() < 1e-9);
        assert_eq!(episode.world().agents[0].position, Position::new(2, 1));
    }
}
