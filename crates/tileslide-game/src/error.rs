//! Engine errors.

use tileslide_core::{GridError, Move};

/// Errors raised by puzzle operations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From,
)]
pub enum PuzzleError {
    /// A grid-level failure: invalid dimensions, an out-of-bounds query, or
    /// an invalid reconstructed tile arrangement.
    #[display("{_0}")]
    Grid(#[from] GridError),
    /// Undo was requested with no recorded turns.
    #[display("nothing to undo")]
    EmptyHistory,
    /// A reconstructed history contains a move outside the grid.
    #[display("recorded move {mv} reaches outside the {width}x{height} grid")]
    MoveOutOfBounds {
        /// The offending move.
        mv: Move,
        /// Grid width.
        width: usize,
        /// Grid height.
        height: usize,
    },
}
