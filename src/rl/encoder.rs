//! Observation encoder - converts WorldState to egocentric feature vectors

use tracing::trace;

use crate::game::{GameConfig, GameError, NUM_AGENTS, check_agent};
use crate::infra::{Orientation, Position};
use crate::state::{Cell, WorldState};

/// One-hot slots per window cell: Empty, Wall, SmallBox, BigBox, Goal, OtherAgent.
pub const CELL_FEATURES: usize = 6;
const SLOT_EMPTY: usize = 0;
const SLOT_WALL: usize = 1;
const SLOT_SMALL_BOX: usize = 2;
const SLOT_BIG_BOX: usize = 3;
const SLOT_GOAL: usize = 4;
const SLOT_OTHER_AGENT: usize = 5;

/// Builds each agent's fixed-length view of the world.
///
/// Layout of the vector:
/// - `(2r+1)^2` window cells, row-major in the agent's frame (first row is the
///   farthest row ahead), `CELL_FEATURES` values each
/// - orientation one-hot (North, East, South, West)
/// - one-hot of the observing agent's index
#[derive(Debug, Clone)]
pub struct StateEncoder {
    radius: usize,
}

impl StateEncoder {
    /// `view_radius = None` picks the smallest window that covers the whole
    /// grid from any cell.
    pub fn new(view_radius: Option<usize>, rows: i32, cols: i32) -> Self {
        let radius =
            view_radius.unwrap_or_else(|| (rows.max(cols).max(1) - 1) as usize);
        Self { radius }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.view_radius,
            config.layout.map.rows,
            config.layout.map.cols,
        )
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    pub fn window_side(&self) -> usize {
        2 * self.radius + 1
    }

    pub fn size(&self) -> usize {
        let side = self.window_side();
        side * side * CELL_FEATURES + Orientation::ALL.len() + NUM_AGENTS
    }

    pub fn encode(&self, world: &WorldState, agent: usize) -> Result<Vec<f64>, GameError> {
        let mut obs = vec![0.0; self.size()];
        self.encode_into(world, agent, &mut obs)?;
        Ok(obs)
    }

    /// Writes the observation into `out`, which must hold exactly `size()` values.
    /// `world` is only read.
    pub fn encode_into(
        &self,
        world: &WorldState,
        agent: usize,
        out: &mut [f64],
    ) -> Result<(), GameError> {
        check_agent(agent)?;
        if out.len() != self.size() {
            return Err(GameError::BufferSize {
                expected: self.size(),
                actual: out.len(),
            });
        }
        out.fill(0.0);

        let me = world.agents[agent];
        let other = world.agents[1 - agent].position;
        let r = self.radius as i32;

        let mut offset = 0;
        for dr in -r..=r {
            for dc in -r..=r {
                let (wr, wc) = me.orientation.rotate_offset(dr, dc);
                let pos = me.position.offset(wr, wc);
                out[offset + Self::cell_slot(world, &pos, &other)] = 1.0;
                offset += CELL_FEATURES;
            }
        }

        out[offset + me.orientation.index()] = 1.0;
        offset += Orientation::ALL.len();
        out[offset + agent] = 1.0;

        trace!("Encoded {} values for agent {}", out.len(), agent);
        Ok(())
    }

    fn cell_slot(world: &WorldState, pos: &Position, other: &Position) -> usize {
        if pos == other {
            return SLOT_OTHER_AGENT;
        }
        match world.map.get(pos) {
            None | Some(Cell::Wall) => SLOT_WALL,
            Some(Cell::Empty) => SLOT_EMPTY,
            Some(Cell::SmallBox) => SLOT_SMALL_BOX,
            Some(Cell::BigBox) => SLOT_BIG_BOX,
            Some(Cell::Goal) => SLOT_GOAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Layout;

    fn slot_at(obs: &[f64], cell_index: usize) -> usize {
        let block = &obs[cell_index * CELL_FEATURES..(cell_index + 1) * CELL_FEATURES];
        assert_eq!(block.iter().sum::<f64>(), 1.0);
        block.iter().position(|v| *v == 1.0).unwrap()
    }

    #[test]
    fn test_encoder_sizes() {
        assert_eq!(StateEncoder::new(Some(1), 8, 8).size(), 9 * 6 + 4 + 2);
        assert_eq!(StateEncoder::new(Some(0), 8, 8).size(), 6 + 4 + 2);
        // Full view grows with the grid.
        let small = StateEncoder::new(None, 3, 3);
        let large = StateEncoder::new(None, 8, 8);
        assert_eq!(small.radius(), 2);
        assert_eq!(small.size(), 25 * 6 + 6);
        assert!(large.size() > small.size());
    }

    #[test]
    fn test_window_is_rotated_into_agent_frame() {
        let layout = Layout::parse("GGGG\n.BB.\n0b.1\n#...").unwrap();
        let world = WorldState::new(&layout, [Orientation::East, Orientation::North]);
        let encoder = StateEncoder::new(Some(1), 4, 4);
        let obs = encoder.encode(&world, 0).unwrap();

        // Agent 0 at (2,0) facing east. Agent-frame row 0 is the column to the east.
        // Window cells (row-major, 3x3): index 1 is straight ahead, 4 is self.
        assert_eq!(slot_at(&obs, 1), SLOT_SMALL_BOX); // (2,1)
        assert_eq!(slot_at(&obs, 0), SLOT_BIG_BOX); // ahead-left (1,1)
        assert_eq!(slot_at(&obs, 2), SLOT_EMPTY); // ahead-right (3,1)
        assert_eq!(slot_at(&obs, 3), SLOT_EMPTY); // left (1,0)
        assert_eq!(slot_at(&obs, 4), SLOT_EMPTY); // self (2,0)
        assert_eq!(slot_at(&obs, 5), SLOT_WALL); // right (3,0)
        assert_eq!(slot_at(&obs, 7), SLOT_WALL); // behind, off the grid

        let tail = &obs[9 * CELL_FEATURES..];
        assert_eq!(tail, &[0.0, 1.0, 0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_other_agent_and_goal_visible() {
        let layout = Layout::parse("GGGG\n.BB.\n..01\n....").unwrap();
        let world = WorldState::new(&layout, [Orientation::North, Orientation::North]);
        let encoder = StateEncoder::new(Some(1), 4, 4);

        let obs = encoder.encode(&world, 0).unwrap();
        assert_eq!(slot_at(&obs, 5), SLOT_OTHER_AGENT);
        assert_eq!(slot_at(&obs, 1), SLOT_BIG_BOX);

        let obs = encoder.encode(&world, 1).unwrap();
        assert_eq!(slot_at(&obs, 3), SLOT_OTHER_AGENT);
        assert_eq!(slot_at(&obs, 2), SLOT_WALL);
        assert_eq!(obs[obs.len() - 1], 1.0);

        let far = StateEncoder::new(Some(2), 4, 4).encode(&world, 0).unwrap();
        // Two rows ahead of (2,2) is the goal row.
        assert_eq!(slot_at(&far, 2), SLOT_GOAL);
    }

    #[test]
    fn test_encode_into_checks_buffer_and_agent() {
        let world = WorldState::new(
            &Layout::reference(),
            [Orientation::East, Orientation::West],
        );
        let encoder = StateEncoder::new(Some(1), 8, 8);
        let mut short = vec![0.0; 3];
        assert!(matches!(
            encoder.encode_into(&world, 0, &mut short),
            Err(GameError::BufferSize { actual: 3, .. })
        ));
        let mut buf = vec![7.0; encoder.size()];
        assert!(matches!(
            encoder.encode_into(&world, 2, &mut buf),
            Err(GameError::InvalidAgent { agent: 2 })
        ));
        encoder.encode_into(&world, 1, &mut buf).unwrap();
        assert!(buf.iter().all(|v| *v == 0.0 || *v == 1.0));
    }
}
