//! The puzzle session: grid plus turn history.

use rand::{Rng, RngExt};
use tileslide_core::{Grid, GridError, History, Move, Position, Turn};

use crate::PuzzleError;

/// A sliding-tile puzzle in progress.
///
/// Owns the tile grid and the history of turns made since the last shuffle
/// or load. All mutation goes through the methods here, so every
/// player-visible change is recorded as an undoable [`Turn`]; callers only
/// ever see read-only views of the grid.
///
/// Equality compares the tile arrangement only, never the history.
///
/// # Example
///
/// ```
/// use tileslide_core::Position;
/// use tileslide_game::Puzzle;
///
/// let mut puzzle = Puzzle::new(3, 3).expect("valid dimensions");
/// assert!(puzzle.is_solved());
///
/// // Slide tile 8 into the blank corner, then take it back.
/// let solved = puzzle.query_tile(Position::new(1, 2)).expect("in bounds");
/// assert!(!solved);
/// puzzle.undo().expect("one turn recorded");
/// assert!(puzzle.is_solved() && puzzle.history_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Puzzle {
    grid: Grid,
    history: History,
}

impl Puzzle {
    /// Creates a puzzle in the canonical solved arrangement with an empty
    /// history.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimensions`] (wrapped in
    /// [`PuzzleError::Grid`]) if either dimension is zero or the grid would
    /// hold fewer than two cells.
    pub fn new(width: usize, height: usize) -> Result<Self, PuzzleError> {
        Ok(Self {
            grid: Grid::new(width, height)?,
            history: History::new(),
        })
    }

    /// Reassembles a puzzle from a deserialized grid and history.
    ///
    /// The grid's tile multiset is already validated by
    /// [`Grid::from_cells`]; this additionally checks that every recorded
    /// move stays inside the grid, so a loaded history can always be
    /// replayed.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::MoveOutOfBounds`] if any turn references a
    /// cell outside the grid.
    pub fn from_parts(grid: Grid, history: History) -> Result<Self, PuzzleError> {
        for turn in history.turns() {
            for mv in turn.moves() {
                if !grid.contains(mv.a()) || !grid.contains(mv.b()) {
                    return Err(PuzzleError::MoveOutOfBounds {
                        mv: *mv,
                        width: grid.width(),
                        height: grid.height(),
                    });
                }
            }
        }
        Ok(Self { grid, history })
    }

    /// Returns a read-only view of the current tile arrangement.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns a read-only view of the recorded turns, oldest-first.
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Returns whether the grid is in the canonical solved arrangement.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.grid.is_solved()
    }

    /// Returns whether there is nothing to undo.
    #[must_use]
    pub fn history_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Randomizes the grid into a solvable, non-solved arrangement.
    ///
    /// Draws from the thread-local generator; see [`Self::shuffle_with`]
    /// for the deterministic variant and the shuffling policy.
    pub fn shuffle(&mut self) {
        self.shuffle_with(&mut rand::rng());
    }

    /// Randomizes the grid using the supplied generator.
    ///
    /// Each pass swaps every cell with a uniformly-random cell of the whole
    /// grid; the pass is retried while it happens to reproduce the solved
    /// arrangement. If the resulting arrangement is unsolvable, one
    /// corrective swap of two tiles flips the inversion parity. The history
    /// is cleared; none of the shuffling swaps are recorded as turns.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        loop {
            for y in 0..self.grid.height() {
                for x in 0..self.grid.width() {
                    let target = Position::new(
                        rng.random_range(0..self.grid.width()),
                        rng.random_range(0..self.grid.height()),
                    );
                    self.grid.swap(Move::new(Position::new(x, y), target));
                }
            }
            if !self.grid.is_solved() {
                break;
            }
        }
        if !self.is_solvable() {
            self.apply_corrective_swap();
        }
        self.history.clear();
    }

    /// Slides the tile at `position` toward the blank, if it can move.
    ///
    /// Checked in priority order:
    ///
    /// 1. If the cell left, above, right, or below `position` (in that
    ///    order) is blank, the tile slides into it: a one-move turn.
    /// 2. Otherwise, if `position` shares a row or column (but not both)
    ///    with the blank, every tile between slides one step toward the
    ///    blank, leaving the blank at `position`: one turn holding one move
    ///    per step, in execution order.
    /// 3. Otherwise nothing happens and no turn is recorded.
    ///
    /// Returns whether the grid is solved after the slide (`false` for the
    /// no-op case).
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] (wrapped in [`PuzzleError::Grid`])
    /// if `position` lies outside the grid.
    pub fn query_tile(&mut self, position: Position) -> Result<bool, PuzzleError> {
        if !self.grid.contains(position) {
            return Err(GridError::OutOfBounds {
                position,
                width: self.grid.width(),
                height: self.grid.height(),
            }
            .into());
        }

        // Left, up, right, down: at most one of these can be the blank.
        let neighbors = [
            position.x().checked_sub(1).map(|x| Position::new(x, position.y())),
            position.y().checked_sub(1).map(|y| Position::new(position.x(), y)),
            Some(Position::new(position.x() + 1, position.y())),
            Some(Position::new(position.x(), position.y() + 1)),
        ];
        for neighbor in neighbors.into_iter().flatten() {
            if self.grid.contains(neighbor) && self.grid.cell(neighbor).is_none() {
                let mv = Move::new(position, neighbor);
                self.grid.swap(mv);
                self.history.push(Turn::single(mv));
                return Ok(self.grid.is_solved());
            }
        }

        let blank = self.grid.blank_position();
        if (position.x() == blank.x()) != (position.y() == blank.y()) {
            let mut turn = Turn::new();
            let mut cursor = blank;
            while cursor != position {
                let next = step_toward(cursor, position);
                let mv = Move::new(cursor, next);
                self.grid.swap(mv);
                turn.push(mv);
                cursor = next;
            }
            self.history.push(turn);
            return Ok(self.grid.is_solved());
        }

        Ok(false)
    }

    /// Takes back the most recent turn.
    ///
    /// The turn's moves are replayed in reverse order; since every move is
    /// its own inverse, this restores the grid to its arrangement before
    /// the turn. No new turn is recorded.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::EmptyHistory`] if no turns are recorded;
    /// check [`Self::history_empty`] first.
    pub fn undo(&mut self) -> Result<(), PuzzleError> {
        let turn = self.history.pop().ok_or(PuzzleError::EmptyHistory)?;
        for mv in turn.moves().iter().rev() {
            self.grid.swap(*mv);
        }
        Ok(())
    }

    /// Classifies the current arrangement with the inversion-parity rule.
    ///
    /// Counts inversions over the row-major flattening (pairs of tiles in
    /// reading order whose numbers are descending) and combines them with
    /// the blank's row counted from the bottom, starting at 1: on
    /// even-width grids with the blank an even number of rows from the
    /// bottom the arrangement is solvable iff the inversion count is odd;
    /// in every other case iff it is even.
    fn is_solvable(&self) -> bool {
        let cells = self.grid.cells();
        let mut inversions = 0_usize;
        let mut blank_row = 0;
        for (i, cell) in cells.iter().enumerate() {
            let Some(a) = cell else {
                blank_row = i / self.grid.width();
                continue;
            };
            for later in &cells[i + 1..] {
                if let Some(b) = later
                    && b < a
                {
                    inversions += 1;
                }
            }
        }

        let blank_from_bottom = self.grid.height() - blank_row;
        if self.grid.width() % 2 == 0 && blank_from_bottom % 2 == 0 {
            inversions % 2 == 1
        } else {
            inversions % 2 == 0
        }
    }

    /// Makes an unsolvable arrangement solvable by swapping two tiles.
    ///
    /// Swapping two non-blank tiles with only blanks between them in
    /// reading order changes the inversion count by an odd amount, flipping
    /// the parity without moving the blank. On grids at least three cells
    /// wide the swap happens on the top row, steering around the blank; on
    /// narrower grids the first two tiles in reading order are used, and a
    /// grid with fewer than two tiles is left as is.
    fn apply_corrective_swap(&mut self) {
        if self.grid.width() >= 3 {
            let (a, b) = if self.grid.cell(Position::new(0, 0)).is_none() {
                (Position::new(1, 0), Position::new(2, 0))
            } else if self.grid.cell(Position::new(1, 0)).is_none() {
                (Position::new(0, 0), Position::new(2, 0))
            } else {
                (Position::new(0, 0), Position::new(1, 0))
            };
            self.grid.swap(Move::new(a, b));
        } else {
            let width = self.grid.width();
            let tiles: Vec<Position> = self
                .grid
                .cells()
                .iter()
                .enumerate()
                .filter(|(_, cell)| cell.is_some())
                .map(|(i, _)| Position::new(i % width, i / width))
                .take(2)
                .collect();
            if let [a, b] = tiles[..] {
                self.grid.swap(Move::new(a, b));
            }
        }
    }
}

impl PartialEq for Puzzle {
    /// Compares dimensions and tile arrangement; the history is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.grid == other.grid
    }
}

impl Eq for Puzzle {}

/// One step from `from` toward `to` along their shared row or column.
fn step_toward(from: Position, to: Position) -> Position {
    if from.x() == to.x() {
        let y = if to.y() > from.y() {
            from.y() + 1
        } else {
            from.y() - 1
        };
        Position::new(from.x(), y)
    } else {
        let x = if to.x() > from.x() {
            from.x() + 1
        } else {
            from.x() - 1
        };
        Position::new(x, from.y())
    }
}
