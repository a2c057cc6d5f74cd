use crate::infra::{Orientation, Position};

/// Position and facing of one agent. Mutated only by the move resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentState {
    pub position: Position,
    pub orientation: Orientation,
}

impl AgentState {
    pub fn new(position: Position, orientation: Orientation) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Cell directly in front of the agent.
    pub fn ahead(&self) -> Position {
        self.position.step(self.orientation)
    }
}
