/// Grid coordinate as (row, col). Row 0 is the northern edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn distance(&self, other: &Position) -> i32 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }

    pub fn is_adjacent(&self, other: &Position) -> bool {
        self.distance(other) == 1
    }

    /// The neighbouring cell in the given direction. May lie outside the grid.
    pub fn step(&self, orientation: Orientation) -> Position {
        let (dr, dc) = orientation.delta();
        Position::new(self.row + dr, self.col + dc)
    }

    pub fn offset(&self, dr: i32, dc: i32) -> Position {
        Position::new(self.row + dr, self.col + dc)
    }
}

/// Facing direction of an agent. Rotations wrap modulo 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    North,
    East,
    South,
    West,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::North,
        Orientation::East,
        Orientation::South,
        Orientation::West,
    ];

    pub fn index(self) -> usize {
        match self {
            Orientation::North => 0,
            Orientation::East => 1,
            Orientation::South => 2,
            Orientation::West => 3,
        }
    }

    pub fn from_index(index: usize) -> Orientation {
        Self::ALL[index % 4]
    }

    pub fn turn_left(self) -> Orientation {
        Self::from_index(self.index() + 3)
    }

    pub fn turn_right(self) -> Orientation {
        Self::from_index(self.index() + 1)
    }

    pub fn opposite(self) -> Orientation {
        Self::from_index(self.index() + 2)
    }

    /// (row, col) delta of one step forward.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Orientation::North => (-1, 0),
            Orientation::East => (0, 1),
            Orientation::South => (1, 0),
            Orientation::West => (0, -1),
        }
    }

    /// Maps an offset expressed in the agent's frame (row -1 is straight ahead,
    /// col +1 is to the right) onto a world offset.
    pub fn rotate_offset(self, dr: i32, dc: i32) -> (i32, i32) {
        match self {
            Orientation::North => (dr, dc),
            Orientation::East => (dc, -dr),
            Orientation::South => (-dr, -dc),
            Orientation::West => (-dc, dr),
        }
    }

    pub fn arrow(self) -> char {
        match self {
            Orientation::North => '^',
            Orientation::East => '>',
            Orientation::South => 'v',
            Orientation::West => '<',
        }
    }
}
