//! The puzzle grid.

use std::fmt::{self, Display};

use crate::{error::GridError, moves::Move, position::Position, tile::Tile};

/// A rectangular arrangement of numbered tiles with one blank cell.
///
/// Cells are stored row-major; the blank cell is `None`. Every grid this
/// crate hands out holds the tiles `1..width * height` exactly once each
/// plus exactly one blank, and every mutation preserves that invariant.
///
/// Equality compares dimensions and cell contents only.
///
/// # Examples
///
/// ```
/// use tileslide_core::{Grid, Position, Tile};
///
/// let grid = Grid::new(4, 4).expect("valid dimensions");
/// assert!(grid.is_solved());
/// assert_eq!(grid.cell(Position::new(0, 0)), Tile::new(1));
/// assert_eq!(grid.cell(Position::new(3, 3)), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Option<Tile>>,
}

impl Grid {
    /// Creates a grid in the canonical solved arrangement.
    ///
    /// Tiles run 1 upwards left-to-right, top-to-bottom, with the blank in
    /// the bottom-right corner.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimensions`] if either dimension is zero
    /// or the grid would hold fewer than two cells.
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        let cell_count = Self::checked_cell_count(width, height)?;
        let mut cells: Vec<Option<Tile>> = (1..cell_count).map(Tile::new).collect();
        cells.push(None);
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Reconstructs a grid from row-major cells, validating the tile
    /// multiset.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimensions`] for unusable dimensions,
    /// [`GridError::CellCount`] if `cells` does not hold `width * height`
    /// entries, [`GridError::TileOutOfRange`] or [`GridError::DuplicateTile`]
    /// if the tile numbers are not exactly `1..width * height`, and
    /// [`GridError::BlankCount`] unless exactly one cell is blank.
    pub fn from_cells(
        width: usize,
        height: usize,
        cells: Vec<Option<Tile>>,
    ) -> Result<Self, GridError> {
        let cell_count = Self::checked_cell_count(width, height)?;
        if cells.len() != cell_count {
            return Err(GridError::CellCount {
                expected: cell_count,
                actual: cells.len(),
            });
        }

        let mut blanks = 0;
        let mut seen = vec![false; cell_count];
        for cell in &cells {
            match cell {
                None => blanks += 1,
                Some(tile) => {
                    let value = tile.value();
                    if value >= cell_count {
                        return Err(GridError::TileOutOfRange {
                            value,
                            cells: cell_count,
                        });
                    }
                    if seen[value - 1] {
                        return Err(GridError::DuplicateTile { value });
                    }
                    seen[value - 1] = true;
                }
            }
        }
        if blanks != 1 {
            return Err(GridError::BlankCount { count: blanks });
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    fn checked_cell_count(width: usize, height: usize) -> Result<usize, GridError> {
        match width.checked_mul(height) {
            Some(count) if width >= 1 && height >= 1 && count >= 2 => Ok(count),
            _ => Err(GridError::InvalidDimensions { width, height }),
        }
    }

    /// Returns the grid width.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Returns the grid height.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Returns whether `position` lies inside the grid.
    #[must_use]
    pub const fn contains(&self, position: Position) -> bool {
        position.x() < self.width && position.y() < self.height
    }

    /// Returns the tile at `position`, or `None` for the blank cell.
    ///
    /// # Panics
    ///
    /// Panics if `position` is outside the grid; check with
    /// [`Self::contains`] first when the position comes from user input.
    #[must_use]
    pub fn cell(&self, position: Position) -> Option<Tile> {
        assert!(
            self.contains(position),
            "position {position} is outside the {}x{} grid",
            self.width,
            self.height
        );
        self.cells[self.index(position)]
    }

    /// Swaps the contents of the two cells named by `mv`.
    ///
    /// Applying the same move again restores the previous arrangement.
    ///
    /// # Panics
    ///
    /// Panics if either end of the move is outside the grid.
    pub fn swap(&mut self, mv: Move) {
        assert!(
            self.contains(mv.a()) && self.contains(mv.b()),
            "move {mv} reaches outside the {}x{} grid",
            self.width,
            self.height
        );
        let a = self.index(mv.a());
        let b = self.index(mv.b());
        self.cells.swap(a, b);
    }

    /// Returns the position of the blank cell.
    #[must_use]
    #[expect(clippy::missing_panics_doc)]
    pub fn blank_position(&self) -> Position {
        let index = self
            .cells
            .iter()
            .position(Option::is_none)
            .expect("grid holds exactly one blank cell");
        Position::new(index % self.width, index / self.width)
    }

    /// Returns whether the grid is in the canonical solved arrangement.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        let last = self.cells.len() - 1;
        self.cells.iter().enumerate().all(|(i, cell)| {
            if i == last {
                cell.is_none()
            } else {
                *cell == Tile::new(i + 1)
            }
        })
    }

    /// Returns the cells row-major, top row first.
    #[must_use]
    pub fn cells(&self) -> &[Option<Tile>] {
        &self.cells
    }

    /// Returns the rows top-to-bottom, each `width` cells long.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<Tile>]> {
        self.cells.chunks(self.width)
    }

    const fn index(&self, position: Position) -> usize {
        position.y() * self.width + position.x()
    }
}

/// Renders the grid in reading order, one line per row.
///
/// Tile numbers are zero-padded so columns align; the blank cell prints as
/// spaces.
impl Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = (self.cells.len() - 1).to_string().len();
        for (y, row) in self.rows().enumerate() {
            for cell in row {
                match cell {
                    Some(tile) => write!(f, "{:0digits$} ", tile.value())?,
                    None => write!(f, "{:digits$} ", "")?,
                }
            }
            if y != self.height - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_new_is_canonical_solved() {
        for (width, height) in [(1, 2), (2, 1), (2, 2), (3, 3), (4, 4), (5, 2)] {
            let grid = Grid::new(width, height).unwrap();
            assert!(grid.is_solved(), "{width}x{height} starts solved");
            assert_eq!(grid.blank_position(), Position::new(width - 1, height - 1));
            for y in 0..height {
                for x in 0..width {
                    let expected = if (x, y) == (width - 1, height - 1) {
                        None
                    } else {
                        Tile::new(y * width + x + 1)
                    };
                    assert_eq!(grid.cell(Position::new(x, y)), expected);
                }
            }
        }
    }

    #[test]
    fn test_new_rejects_unusable_dimensions() {
        for (width, height) in [(0, 0), (0, 3), (3, 0), (1, 1)] {
            assert_eq!(
                Grid::new(width, height),
                Err(GridError::InvalidDimensions { width, height })
            );
        }
    }

    #[test]
    fn test_from_cells_validates_tile_multiset() {
        let solved = Grid::new(2, 2).unwrap();
        let roundtrip = Grid::from_cells(2, 2, solved.cells().to_vec()).unwrap();
        assert_eq!(roundtrip, solved);

        // Wrong number of cells
        assert_eq!(
            Grid::from_cells(2, 2, vec![Tile::new(1), None]),
            Err(GridError::CellCount {
                expected: 4,
                actual: 2
            })
        );

        // Tile number beyond width * height - 1
        assert_eq!(
            Grid::from_cells(2, 2, vec![Tile::new(1), Tile::new(2), Tile::new(4), None]),
            Err(GridError::TileOutOfRange { value: 4, cells: 4 })
        );

        // Duplicated tile
        assert_eq!(
            Grid::from_cells(2, 2, vec![Tile::new(1), Tile::new(2), Tile::new(2), None]),
            Err(GridError::DuplicateTile { value: 2 })
        );

        // Two blanks
        assert_eq!(
            Grid::from_cells(2, 2, vec![Tile::new(1), Tile::new(2), None, None]),
            Err(GridError::BlankCount { count: 2 })
        );
    }

    #[test]
    fn test_swap_moves_tiles() {
        let mut grid = Grid::new(3, 3).unwrap();
        let mv = Move::new(Position::new(1, 2), Position::new(2, 2));
        grid.swap(mv);

        assert!(!grid.is_solved());
        assert_eq!(grid.cell(Position::new(2, 2)), Tile::new(8));
        assert_eq!(grid.cell(Position::new(1, 2)), None);
        assert_eq!(grid.blank_position(), Position::new(1, 2));
    }

    #[test]
    fn test_display_pads_columns() {
        let grid = Grid::new(3, 3).unwrap();
        assert_eq!(format!("{grid}"), "1 2 3 \n4 5 6 \n7 8   ");

        // Two-digit tiles are zero-padded
        let grid = Grid::new(4, 4).unwrap();
        let rendering = format!("{grid}");
        assert!(rendering.starts_with("01 02 03 04 \n"));
        assert!(rendering.ends_with("13 14 15    "));
    }

    proptest! {
        #[test]
        fn swap_is_self_inverse(
            (width, height, ax, ay, bx, by) in (2usize..6, 2usize..6).prop_flat_map(
                |(width, height)| (
                    Just(width),
                    Just(height),
                    0..width,
                    0..height,
                    0..width,
                    0..height,
                ),
            ),
        ) {
            let original = Grid::new(width, height).unwrap();
            let mv = Move::new(Position::new(ax, ay), Position::new(bx, by));

            let mut grid = original.clone();
            grid.swap(mv);
            grid.swap(mv);
            prop_assert_eq!(grid, original);
        }
    }
}
