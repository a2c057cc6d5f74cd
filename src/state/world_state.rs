use crate::game::{GameError, NUM_AGENTS};
use crate::infra::{Orientation, Position};

use super::layout::Layout;
use super::map::{Cell, Map};
use super::player_state::AgentState;

/// Grid plus both agents. One live instance per episode.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldState {
    pub map: Map,
    pub agents: [AgentState; NUM_AGENTS],
}

impl WorldState {
    pub fn new(layout: &Layout, orientations: [Orientation; NUM_AGENTS]) -> Self {
        Self {
            map: layout.map.clone(),
            agents: [
                AgentState::new(layout.starts[0], orientations[0]),
                AgentState::new(layout.starts[1], orientations[1]),
            ],
        }
    }

    pub fn agent(&self, index: usize) -> Result<&AgentState, GameError> {
        self.agents
            .get(index)
            .ok_or(GameError::InvalidAgent { agent: index })
    }

    pub fn agent_at(&self, pos: &Position) -> Option<usize> {
        self.agents.iter().position(|a| a.position == *pos)
    }

    /// Open floor that no agent currently stands on.
    pub fn is_free(&self, pos: &Position) -> bool {
        self.map.is_open(pos) && self.agent_at(pos).is_none()
    }

    pub fn big_box_cells(&self) -> Vec<Position> {
        self.map.positions_of(Cell::BigBox)
    }

    pub fn big_box_on_goal(&self) -> bool {
        let cells = self.big_box_cells();
        !cells.is_empty() && cells.iter().all(|p| self.map.is_goal(p))
    }

    /// Text rendering with agents drawn as orientation arrows.
    pub fn draw_ascii_map(&self) -> String {
        let mut out = String::with_capacity(((self.map.cols + 1) * self.map.rows) as usize);
        for row in 0..self.map.rows {
            for col in 0..self.map.cols {
                let pos = Position::new(row, col);
                let glyph = match self.agent_at(&pos) {
                    Some(i) => self.agents[i].orientation.arrow(),
                    None => self.map.get(&pos).map(Cell::glyph).unwrap_or(' '),
                };
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }
}
