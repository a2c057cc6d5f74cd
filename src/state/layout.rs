use std::collections::{HashSet, VecDeque};

use tracing::debug;

use crate::game::GameError;
use crate::infra::{Orientation, Position};

use super::map::{Cell, Map};

/// Reference 8x8 field: the whole top row is goal, two small boxes flank the
/// big box, and the agents start on the bottom rows.
pub const REFERENCE_LAYOUT: &str = "\
GGGGGGGG
........
........
.b.BB.b.
........
........
.0....1.
........";

/// Static starting configuration of an episode.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub map: Map,
    pub starts: [Position; 2],
}

impl Layout {
    pub fn reference() -> Self {
        // The reference text is a compile-time constant known to parse.
        match Self::parse(REFERENCE_LAYOUT) {
            Ok(layout) => layout,
            Err(e) => unreachable!("reference layout is invalid: {e}"),
        }
    }

    /// Parses the text layout format. `0` and `1` mark the agent starts and
    /// stand on empty floor.
    pub fn parse(text: &str) -> Result<Self, GameError> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect();

        let rows = lines.len() as i32;
        let cols = lines.first().map(|l| l.chars().count()).unwrap_or(0) as i32;
        if rows == 0 || cols == 0 {
            return Err(GameError::InvalidLayout("layout is empty".into()));
        }

        let mut map = Map::new(rows, cols);
        let mut starts: [Option<Position>; 2] = [None, None];

        for (row, line) in lines.iter().enumerate() {
            if line.chars().count() as i32 != cols {
                return Err(GameError::InvalidLayout(format!(
                    "row {} has {} columns, expected {}",
                    row,
                    line.chars().count(),
                    cols
                )));
            }
            for (col, glyph) in line.chars().enumerate() {
                let pos = Position::new(row as i32, col as i32);
                match glyph {
                    '0' | '1' => {
                        let agent = if glyph == '0' { 0 } else { 1 };
                        if starts[agent].replace(pos).is_some() {
                            return Err(GameError::InvalidLayout(format!(
                                "agent {agent} placed twice"
                            )));
                        }
                    }
                    _ => {
                        let cell = Cell::from_glyph(glyph).ok_or_else(|| {
                            GameError::InvalidLayout(format!("unknown glyph '{glyph}'"))
                        })?;
                        map.set_cell(pos, cell)?;
                    }
                }
            }
        }

        let starts = match starts {
            [Some(a), Some(b)] => [a, b],
            _ => {
                return Err(GameError::InvalidLayout(
                    "both agents 0 and 1 must be placed".into(),
                ));
            }
        };

        let layout = Self { map, starts };
        layout.validate()?;
        Ok(layout)
    }

    /// Checks the static invariants of a layout: a two-cell big box off the
    /// goal, at least one goal cell, and two distinct in-bounds agent starts on
    /// open floor.
    pub fn validate(&self) -> Result<(), GameError> {
        for (agent, start) in self.starts.iter().enumerate() {
            if !self.map.in_bounds(start) {
                return Err(GameError::InvalidLayout(format!(
                    "agent {agent} starts outside the grid at ({}, {})",
                    start.row, start.col
                )));
            }
            if !self.map.is_open(start) {
                return Err(GameError::InvalidLayout(format!(
                    "agent {agent} starts on a blocked cell at ({}, {})",
                    start.row, start.col
                )));
            }
        }
        if self.starts[0] == self.starts[1] {
            return Err(GameError::InvalidLayout(
                "both agents start on the same cell".into(),
            ));
        }

        let big = self.map.positions_of(Cell::BigBox);
        if big.len() != 2 || !big[0].is_adjacent(&big[1]) {
            return Err(GameError::InvalidLayout(
                "big box must cover exactly two adjacent cells".into(),
            ));
        }
        if self.map.goal_positions().is_empty() {
            return Err(GameError::InvalidLayout("no goal cells".into()));
        }
        if big.iter().all(|p| self.map.is_goal(p)) {
            return Err(GameError::InvalidLayout(
                "big box already rests on the goal".into(),
            ));
        }
        Ok(())
    }

    /// Breadth-first search over big-box placements, ignoring agents and small
    /// boxes. A push needs open terrain both ahead of the box and behind it,
    /// where the two agents stand.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn check_goal_reachable(&self) -> Result<(), GameError> {
        let start = self.map.positions_of(Cell::BigBox);
        let (anchor, other) = match start.as_slice() {
            [a, b] => (*a.min(b), *a.max(b)),
            _ => {
                return Err(GameError::InvalidLayout(
                    "big box must cover exactly two adjacent cells".into(),
                ));
            }
        };
        let axis = (other.row - anchor.row, other.col - anchor.col);
        let push_dirs: Vec<Orientation> = Orientation::ALL
            .into_iter()
            .filter(|o| {
                let (dr, dc) = o.delta();
                dr * axis.0 + dc * axis.1 == 0
            })
            .collect();

        let passable = |pos: &Position| self.map.in_bounds(pos) && !self.map.is_wall(pos);

        let mut visited = HashSet::from([anchor]);
        let mut queue = VecDeque::from([anchor]);

        while let Some(a) = queue.pop_front() {
            let cells = [a, a.offset(axis.0, axis.1)];
            if cells.iter().all(|c| self.map.is_goal(c)) {
                debug!("Goal placement reachable at {:?}", a);
                return Ok(());
            }
            for dir in &push_dirs {
                let ahead_ok = cells.iter().all(|c| passable(&c.step(*dir)));
                let behind_ok = cells.iter().all(|c| passable(&c.step(dir.opposite())));
                let next = a.step(*dir);
                if ahead_ok && behind_ok && visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        Err(GameError::UnreachableGoal)
    }
}
