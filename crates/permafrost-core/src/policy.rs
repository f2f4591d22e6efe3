use crate::lake::{Action, Lake, Tile};
use crate::qlearn::QTable;
use std::fmt;

/// What the greedy policy shows for one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolicyCell {
    Move(Action),
    Hole,
    Goal,
}

/// Greedy policy over a grid, ready for rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Policy {
    width: usize,
    height: usize,
    cells: Vec<PolicyCell>,
}

impl Policy {
    /// Terminal cells keep their marker; every other cell takes the
    /// first-argmax action from the table.
    pub fn greedy(lake: &Lake, q: &QTable) -> Self {
        assert_eq!(
            q.n_states(),
            lake.n_states(),
            "table must cover every grid state"
        );
        let cells = (0..lake.n_states())
            .map(|state| match lake.tile(state) {
                Tile::Hole => PolicyCell::Hole,
                Tile::Goal => PolicyCell::Goal,
                Tile::Start | Tile::Frozen => PolicyCell::Move(q.greedy_action(state)),
            })
            .collect();
        Self {
            width: lake.width(),
            height: lake.height(),
            cells,
        }
    }

    pub fn cell(&self, state: usize) -> PolicyCell {
        assert!(state < self.cells.len(), "state index out of range");
        self.cells[state]
    }

    /// One line per grid row; every cell renders as exactly three characters:
    /// `" H "`, `" G "`, or the action glyph between spaces.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for row in 0..self.height {
            for col in 0..self.width {
                let marker = match self.cells[row * self.width + col] {
                    PolicyCell::Hole => 'H',
                    PolicyCell::Goal => 'G',
                    PolicyCell::Move(action) => action.glyph(),
                };
                out.push(' ');
                out.push(marker);
                out.push(' ');
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
