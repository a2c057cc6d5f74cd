use crate::game::GameError;
use crate::infra::Position;

/// Content of a single grid cell.
///
/// Boxes sit on top of the terrain; the goal layer is kept separately so a box
/// pushed off a goal cell leaves the goal behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Wall,
    SmallBox,
    BigBox,
    Goal,
}

impl Cell {
    /// Floor an agent or box may enter.
    pub fn is_open(self) -> bool {
        matches!(self, Cell::Empty | Cell::Goal)
    }

    pub fn is_box(self) -> bool {
        matches!(self, Cell::SmallBox | Cell::BigBox)
    }

    pub fn glyph(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Wall => '#',
            Cell::SmallBox => 'b',
            Cell::BigBox => 'B',
            Cell::Goal => 'G',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Cell> {
        match glyph {
            '.' => Some(Cell::Empty),
            '#' => Some(Cell::Wall),
            'b' => Some(Cell::SmallBox),
            'B' => Some(Cell::BigBox),
            'G' => Some(Cell::Goal),
            _ => None,
        }
    }
}

/// Fixed-size rectangular cell map. The shape never changes after construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Map {
    pub rows: i32,
    pub cols: i32,
    cells: Vec<Cell>,
    goals: Vec<bool>,
}

impl Map {
    pub fn new(rows: i32, cols: i32) -> Self {
        let len = (rows.max(0) * cols.max(0)) as usize;
        Self {
            rows,
            cols,
            cells: vec![Cell::Empty; len],
            goals: vec![false; len],
        }
    }

    fn index(&self, pos: &Position) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| (pos.row * self.cols + pos.col) as usize)
    }

    pub fn in_bounds(&self, pos: &Position) -> bool {
        pos.row >= 0 && pos.row < self.rows && pos.col >= 0 && pos.col < self.cols
    }

    /// Cell at `pos`, or `None` outside the grid.
    pub fn get(&self, pos: &Position) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    pub fn cell_at(&self, pos: &Position) -> Result<Cell, GameError> {
        self.get(pos).ok_or(GameError::OutOfRange { pos: *pos })
    }

    /// Writes a cell value. `Goal` marks the goal layer, `Empty` and `Wall`
    /// clear it, boxes keep whatever goal lies underneath.
    pub fn set_cell(&mut self, pos: Position, cell: Cell) -> Result<(), GameError> {
        let i = self.index(&pos).ok_or(GameError::OutOfRange { pos })?;
        match cell {
            Cell::Goal => self.goals[i] = true,
            Cell::Empty | Cell::Wall => self.goals[i] = false,
            Cell::SmallBox | Cell::BigBox => {}
        }
        self.cells[i] = cell;
        Ok(())
    }

    /// Removes a box from `pos`, restoring the terrain underneath.
    pub fn clear(&mut self, pos: Position) -> Result<(), GameError> {
        let i = self.index(&pos).ok_or(GameError::OutOfRange { pos })?;
        self.cells[i] = if self.goals[i] { Cell::Goal } else { Cell::Empty };
        Ok(())
    }

    /// Moves the box at `from` onto `to`. Both cells must be in range.
    pub fn move_box(&mut self, from: Position, to: Position) -> Result<(), GameError> {
        let cell = self.cell_at(&from)?;
        self.clear(from)?;
        self.set_cell(to, cell)
    }

    pub fn is_goal(&self, pos: &Position) -> bool {
        self.index(pos).map(|i| self.goals[i]).unwrap_or(false)
    }

    /// In bounds and open floor.
    pub fn is_open(&self, pos: &Position) -> bool {
        self.get(pos).is_some_and(Cell::is_open)
    }

    pub fn is_wall(&self, pos: &Position) -> bool {
        matches!(self.get(pos), Some(Cell::Wall))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (Position::new(i as i32 / cols, i as i32 % cols), *cell))
    }

    pub fn positions_of(&self, cell: Cell) -> Vec<Position> {
        self.iter()
            .filter(|(_, c)| *c == cell)
            .map(|(pos, _)| pos)
            .collect()
    }

    pub fn goal_positions(&self) -> Vec<Position> {
        self.iter()
            .filter(|(pos, _)| self.is_goal(pos))
            .map(|(pos, _)| pos)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
