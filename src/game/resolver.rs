//! Simultaneous move resolution.
//!
//! A round is resolved in a fixed order so that the result never depends on
//! the order in which the two actions were submitted:
//!
//! 1. Slipped actions fail; rotations and `Stay` apply immediately.
//! 2. Two forward moves into the two halves of the big box, with both agents
//!    facing the same way, form a cooperative push and succeed or fail together.
//! 3. Remaining forward moves run one after the other: the initiative holder
//!    first against the state at round start, then the other agent against
//!    the state the first move left behind.

use tracing::debug;

use crate::state::{Cell, WorldState};

use super::action::{ActionKind, ActionStatus, NUM_AGENTS, check_agent};
use super::GameError;

/// Everything the reward model and observers need to know about one round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundOutcome {
    pub actions: [ActionKind; NUM_AGENTS],
    pub statuses: [ActionStatus; NUM_AGENTS],
    /// Actions the chance node made fail before they were attempted.
    pub slipped: [bool; NUM_AGENTS],
    pub initiative: usize,
    /// Small boxes that arrived on a goal cell this round.
    pub small_boxes_on_goal: usize,
    pub big_box_pushed: bool,
    pub big_box_on_goal: bool,
}

impl RoundOutcome {
    fn new(
        actions: [ActionKind; NUM_AGENTS],
        slipped: [bool; NUM_AGENTS],
        initiative: usize,
    ) -> Self {
        Self {
            actions,
            statuses: [ActionStatus::Unresolved; NUM_AGENTS],
            slipped,
            initiative,
            small_boxes_on_goal: 0,
            big_box_pushed: false,
            big_box_on_goal: false,
        }
    }

    /// Forward moves that were attempted and blocked. Slips are not bumps.
    pub fn failed_moves(&self) -> usize {
        (0..NUM_AGENTS)
            .filter(|&agent| {
                !self.slipped[agent]
                    && self.actions[agent] == ActionKind::MoveForward
                    && self.statuses[agent] == ActionStatus::Fail
            })
            .count()
    }
}

/// Resolves one round in place.
///
/// `slipped[i]` marks an action the chance node made fail outright.
#[tracing::instrument(level = "trace", skip(world))]
pub fn resolve_round(
    world: &mut WorldState,
    actions: [ActionKind; NUM_AGENTS],
    slipped: [bool; NUM_AGENTS],
    initiative: usize,
) -> Result<RoundOutcome, GameError> {
    check_agent(initiative)?;
    let mut outcome = RoundOutcome::new(actions, slipped, initiative);

    for agent in 0..NUM_AGENTS {
        if slipped[agent] {
            debug!("Agent {} slipped on {}", agent, actions[agent]);
            outcome.statuses[agent] = ActionStatus::Fail;
            continue;
        }
        let state = &mut world.agents[agent];
        match actions[agent] {
            ActionKind::TurnLeft => {
                state.orientation = state.orientation.turn_left();
                outcome.statuses[agent] = ActionStatus::Success;
            }
            ActionKind::TurnRight => {
                state.orientation = state.orientation.turn_right();
                outcome.statuses[agent] = ActionStatus::Success;
            }
            ActionKind::Stay => outcome.statuses[agent] = ActionStatus::Success,
            ActionKind::MoveForward => {}
        }
    }

    let both_moving = outcome
        .statuses
        .iter()
        .all(|s| *s == ActionStatus::Unresolved);
    if both_moving {
        if let Some(pushed) = cooperative_push(world)? {
            let status = if pushed {
                ActionStatus::Success
            } else {
                ActionStatus::Fail
            };
            outcome.statuses = [status; NUM_AGENTS];
            outcome.big_box_pushed = pushed;
            outcome.big_box_on_goal = pushed && world.big_box_on_goal();
            return Ok(outcome);
        }
    }

    for agent in [initiative, 1 - initiative] {
        if outcome.statuses[agent] == ActionStatus::Unresolved {
            outcome.statuses[agent] = move_forward(world, agent, &mut outcome)?;
        }
    }

    Ok(outcome)
}

/// Joint push of the big box. `None` when the agents are not lined up on the
/// two halves of the box, otherwise whether the box moved.
fn cooperative_push(world: &mut WorldState) -> Result<Option<bool>, GameError> {
    let [a, b] = world.agents;
    if a.orientation != b.orientation {
        return Ok(None);
    }
    let (front_a, front_b) = (a.ahead(), b.ahead());
    let on_big_box = |pos| world.map.get(pos) == Some(Cell::BigBox);
    if front_a == front_b || !on_big_box(&front_a) || !on_big_box(&front_b) {
        return Ok(None);
    }

    let dir = a.orientation;
    let (dest_a, dest_b) = (front_a.step(dir), front_b.step(dir));
    if !world.is_free(&dest_a) || !world.is_free(&dest_b) {
        debug!("Big box blocked at {:?}/{:?}", dest_a, dest_b);
        return Ok(Some(false));
    }

    world.map.move_box(front_a, dest_a)?;
    world.map.move_box(front_b, dest_b)?;
    world.agents[0].position = front_a;
    world.agents[1].position = front_b;
    debug!("Big box pushed {:?} onto {:?}/{:?}", dir, dest_a, dest_b);
    Ok(Some(true))
}

/// Single-agent forward move against the current state of `world`.
fn move_forward(
    world: &mut WorldState,
    agent: usize,
    outcome: &mut RoundOutcome,
) -> Result<ActionStatus, GameError> {
    let state = world.agents[agent];
    let target = state.ahead();

    let status = match world.map.get(&target) {
        None | Some(Cell::Wall) => {
            debug!("Agent {} bumped into wall at {:?}", agent, target);
            ActionStatus::Fail
        }
        Some(Cell::BigBox) => {
            debug!("Agent {} cannot push the big box alone", agent);
            ActionStatus::Fail
        }
        Some(Cell::SmallBox) => {
            let beyond = target.step(state.orientation);
            if world.is_free(&beyond) {
                let scored = world.map.is_goal(&beyond) && !world.map.is_goal(&target);
                world.map.move_box(target, beyond)?;
                world.agents[agent].position = target;
                if scored {
                    outcome.small_boxes_on_goal += 1;
                }
                debug!("Agent {} pushed small box onto {:?}", agent, beyond);
                ActionStatus::Success
            } else {
                debug!("Agent {} small box blocked at {:?}", agent, beyond);
                ActionStatus::Fail
            }
        }
        Some(Cell::Empty | Cell::Goal) => {
            if world.agent_at(&target).is_some() {
                debug!("Agent {} blocked by other agent at {:?}", agent, target);
                ActionStatus::Fail
            } else {
                world.agents[agent].position = target;
                ActionStatus::Success
            }
        }
    };

    Ok(status)
}
