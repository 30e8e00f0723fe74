//! Grid construction and access errors.

use crate::position::Position;

/// Errors raised by grid construction and cell access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GridError {
    /// The requested dimensions cannot form a puzzle grid.
    ///
    /// Both dimensions must be at least 1 and the grid must hold at least
    /// two cells, otherwise there is no tile to slide.
    #[display("invalid grid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },
    /// A position lies outside the grid.
    #[display("position {position} is outside the {width}x{height} grid")]
    OutOfBounds {
        /// The offending position.
        position: Position,
        /// Grid width.
        width: usize,
        /// Grid height.
        height: usize,
    },
    /// A reconstructed grid holds the wrong number of cells.
    #[display("expected {expected} cells, got {actual}")]
    CellCount {
        /// `width * height`.
        expected: usize,
        /// Number of cells supplied.
        actual: usize,
    },
    /// A tile value does not fit the grid.
    #[display("tile {value} is out of range for a grid of {cells} cells")]
    TileOutOfRange {
        /// The offending tile value.
        value: usize,
        /// Total cell count of the grid.
        cells: usize,
    },
    /// The same tile value appears more than once.
    #[display("tile {value} appears more than once")]
    DuplicateTile {
        /// The duplicated tile value.
        value: usize,
    },
    /// The grid does not hold exactly one blank cell.
    #[display("expected exactly one blank cell, got {count}")]
    BlankCount {
        /// Number of blank cells supplied.
        count: usize,
    },
}
