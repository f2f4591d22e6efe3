use std::{error::Error, fmt};

/// Tile kinds for the frozen-lake grid. The grid itself is never mutated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Start,
    Frozen,
    Hole,
    Goal,
}

impl Tile {
    pub fn is_terminal(self) -> bool {
        matches!(self, Tile::Hole | Tile::Goal)
    }
}

/// The four moves, each with a fixed (row, col) delta.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Left,
    Down,
    Right,
    Up,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Left, Action::Down, Action::Right, Action::Up];
    pub const COUNT: usize = 4;

    pub fn delta(self) -> (isize, isize) {
        match self {
            Action::Left => (0, -1),
            Action::Down => (1, 0),
            Action::Right => (0, 1),
            Action::Up => (-1, 0),
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Action> {
        Action::ALL.get(index).copied()
    }

    pub fn glyph(self) -> char {
        match self {
            Action::Left => '←',
            Action::Down => '↓',
            Action::Right => '→',
            Action::Up => '↑',
        }
    }
}

/// One environment step: destination, reward, and whether the episode ended.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    pub next_state: usize,
    pub reward: f64,
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LakeError {
    ZeroDimension,
    TileCountMismatch { expected: usize, actual: usize },
    MissingStart,
    MultipleStarts,
    NoTerminalTile,
}

impl fmt::Display for LakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LakeError::ZeroDimension => write!(f, "grid dimensions must be positive"),
            LakeError::TileCountMismatch { expected, actual } => write!(
                f,
                "tile count ({actual}) must equal width * height ({expected})"
            ),
            LakeError::MissingStart => write!(f, "grid must contain a start tile"),
            LakeError::MultipleStarts => write!(f, "grid must contain exactly one start tile"),
            LakeError::NoTerminalTile => {
                write!(f, "grid must contain a hole or goal tile so episodes can end")
            }
        }
    }
}

impl Error for LakeError {}

/// Rectangular grid world. States are indexed row-major: `state = row*width + col`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lake {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
    start: usize,
}

impl Lake {
    /// The fixed 4×4 layout:
    ///
    /// ```text
    /// S F F F
    /// F H F H
    /// F F F H
    /// H F F G
    /// ```
    pub fn four_by_four() -> Self {
        use Tile::{Frozen as F, Goal, Hole as H, Start};
        let tiles = vec![
            Start, F, F, F, //
            F, H, F, H, //
            F, F, F, H, //
            H, F, F, Goal,
        ];
        Self::from_tiles(4, 4, tiles).expect("fixed layout is valid")
    }

    pub fn from_tiles(width: usize, height: usize, tiles: Vec<Tile>) -> Result<Self, LakeError> {
        if width == 0 || height == 0 {
            return Err(LakeError::ZeroDimension);
        }
        let expected = width * height;
        if tiles.len() != expected {
            return Err(LakeError::TileCountMismatch {
                expected,
                actual: tiles.len(),
            });
        }
        let mut starts = tiles.iter().enumerate().filter(|(_, t)| **t == Tile::Start);
        let start = starts.next().map(|(i, _)| i).ok_or(LakeError::MissingStart)?;
        if starts.next().is_some() {
            return Err(LakeError::MultipleStarts);
        }
        if !tiles.iter().any(|t| t.is_terminal()) {
            return Err(LakeError::NoTerminalTile);
        }
        Ok(Self {
            width,
            height,
            tiles,
            start,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn n_states(&self) -> usize {
        self.tiles.len()
    }

    pub fn start_state(&self) -> usize {
        self.start
    }

    pub fn tile(&self, state: usize) -> Tile {
        assert!(state < self.tiles.len(), "state index out of range");
        self.tiles[state]
    }

    pub fn is_terminal(&self, state: usize) -> bool {
        self.tile(state).is_terminal()
    }

    pub fn state_to_coords(&self, state: usize) -> (usize, usize) {
        assert!(state < self.tiles.len(), "state index out of range");
        (state / self.width, state % self.width)
    }

    pub fn coords_to_state(&self, row: usize, col: usize) -> usize {
        assert!(row < self.height && col < self.width, "coords out of range");
        row * self.width + col
    }

    /// Apply `action` from `state`. Moves that would leave the grid keep the
    /// agent in place. Reward is 1 iff the destination tile is the goal; the
    /// step is done iff the destination is a hole or the goal.
    pub fn step(&self, state: usize, action: Action) -> Transition {
        let (row, col) = self.state_to_coords(state);
        let (dr, dc) = action.delta();
        let nr = row as isize + dr;
        let nc = col as isize + dc;

        let next_state = if nr >= 0 && (nr as usize) < self.height && nc >= 0 && (nc as usize) < self.width
        {
            self.coords_to_state(nr as usize, nc as usize)
        } else {
            state
        };

        let tile = self.tile(next_state);
        Transition {
            next_state,
            reward: if tile == Tile::Goal { 1.0 } else { 0.0 },
            done: tile.is_terminal(),
        }
    }
}
