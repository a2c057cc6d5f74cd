use std::fmt;

use super::GameError;

pub const NUM_AGENTS: usize = 2;
pub const NUM_ACTIONS: usize = 4;

/// Action an agent submits for one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    TurnLeft,
    TurnRight,
    MoveForward,
    Stay,
}

impl ActionKind {
    pub const ALL: [ActionKind; NUM_ACTIONS] = [
        ActionKind::TurnLeft,
        ActionKind::TurnRight,
        ActionKind::MoveForward,
        ActionKind::Stay,
    ];

    pub fn index(self) -> usize {
        match self {
            ActionKind::TurnLeft => 0,
            ActionKind::TurnRight => 1,
            ActionKind::MoveForward => 2,
            ActionKind::Stay => 3,
        }
    }
}

impl TryFrom<usize> for ActionKind {
    type Error = GameError;

    fn try_from(action: usize) -> Result<Self, Self::Error> {
        Self::ALL
            .get(action)
            .copied()
            .ok_or(GameError::InvalidAction { action })
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::TurnLeft => "turn left",
            ActionKind::TurnRight => "turn right",
            ActionKind::MoveForward => "move forward",
            ActionKind::Stay => "stay",
        };
        f.write_str(name)
    }
}

/// Outcome of one agent's action within a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionStatus {
    #[default]
    Unresolved,
    Success,
    Fail,
}

impl ActionStatus {
    pub fn is_resolved(self) -> bool {
        self != ActionStatus::Unresolved
    }
}

pub(crate) fn check_agent(agent: usize) -> Result<(), GameError> {
    if agent < NUM_AGENTS {
        Ok(())
    } else {
        Err(GameError::InvalidAgent { agent })
    }
}
