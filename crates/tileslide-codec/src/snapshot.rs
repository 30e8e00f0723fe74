//! Opaque binary snapshot persistence.
//!
//! A snapshot captures a whole puzzle session (dimensions, tiles, turn
//! history) as an undifferentiated byte blob. The layout is private to this
//! module and carries no compatibility promise beyond round-tripping
//! exactly; anything that cannot be decoded back into a valid session is
//! rejected as a whole.
//!
//! Internally the state crosses the serialization boundary as a plain DTO
//! encoded with [`postcard`]; decoding re-validates the state through
//! [`Puzzle::from_parts`], so a truncated or foreign blob can never yield a
//! half-built puzzle.

use std::{fs, io, path::Path};

use log::debug;
use serde::{Deserialize, Serialize};
use tileslide_core::{Grid, History, Move, Position, Tile, Turn};
use tileslide_game::{Puzzle, PuzzleError};

/// Errors raised by the snapshot persistence paths.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum SnapshotError {
    /// Reading or writing the file failed.
    #[display("i/o error: {_0}")]
    Io(#[from] io::Error),
    /// The byte-level encoding or decoding failed.
    #[display("snapshot codec error: {_0}")]
    Codec(#[from] postcard::Error),
    /// The snapshot decoded but does not describe a valid puzzle state.
    #[display("snapshot holds an invalid puzzle state: {_0}")]
    State(#[from] PuzzleError),
}

/// Wire representation of a puzzle session.
///
/// Cells are row-major tile numbers with `0` for the blank; each history
/// turn is its moves' coordinate quadruples in execution order.
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotDto {
    width: usize,
    height: usize,
    cells: Vec<usize>,
    history: Vec<Vec<[usize; 4]>>,
}

impl From<&Puzzle> for SnapshotDto {
    fn from(puzzle: &Puzzle) -> Self {
        let grid = puzzle.grid();
        Self {
            width: grid.width(),
            height: grid.height(),
            cells: grid
                .cells()
                .iter()
                .map(|cell| cell.map_or(0, Tile::value))
                .collect(),
            history: puzzle
                .history()
                .turns()
                .iter()
                .map(|turn| {
                    turn.moves()
                        .iter()
                        .map(|mv| [mv.a().x(), mv.a().y(), mv.b().x(), mv.b().y()])
                        .collect()
                })
                .collect(),
        }
    }
}

impl TryFrom<SnapshotDto> for Puzzle {
    type Error = PuzzleError;

    fn try_from(dto: SnapshotDto) -> Result<Self, Self::Error> {
        // Tile numbering starts at 1, so `Tile::new` maps the 0 marker
        // straight back to the blank cell.
        let cells = dto.cells.into_iter().map(Tile::new).collect();
        let grid = Grid::from_cells(dto.width, dto.height, cells)?;
        let turns: Vec<Turn> = dto
            .history
            .into_iter()
            .map(|moves| {
                moves
                    .into_iter()
                    .map(|[x1, y1, x2, y2]| {
                        Move::new(Position::new(x1, y1), Position::new(x2, y2))
                    })
                    .collect()
            })
            .collect();
        Puzzle::from_parts(grid, History::from(turns))
    }
}

/// Encodes a puzzle session as a byte blob.
///
/// # Errors
///
/// Returns [`SnapshotError::Codec`] if encoding fails; with this DTO that
/// only happens under allocation pressure.
pub fn to_bytes(puzzle: &Puzzle) -> Result<Vec<u8>, SnapshotError> {
    Ok(postcard::to_allocvec(&SnapshotDto::from(puzzle))?)
}

/// Decodes a puzzle session from a byte blob.
///
/// # Errors
///
/// Returns [`SnapshotError::Codec`] for truncated or foreign bytes and
/// [`SnapshotError::State`] if the decoded data violates the engine's
/// invariants.
pub fn from_bytes(bytes: &[u8]) -> Result<Puzzle, SnapshotError> {
    let dto: SnapshotDto = postcard::from_bytes(bytes)?;
    Ok(Puzzle::try_from(dto)?)
}

/// Writes a puzzle snapshot to a file.
///
/// # Errors
///
/// Returns [`SnapshotError::Io`] if the file cannot be written.
pub fn save_blob(path: impl AsRef<Path>, puzzle: &Puzzle) -> Result<(), SnapshotError> {
    let path = path.as_ref();
    debug!("saving puzzle snapshot to {}", path.display());
    fs::write(path, to_bytes(puzzle)?)?;
    Ok(())
}

/// Reads a puzzle snapshot from a file.
///
/// A failed load returns an error and nothing else; any puzzle the caller
/// already holds is untouched.
///
/// # Errors
///
/// Returns [`SnapshotError::Io`] if the file cannot be read, and the
/// decoding errors of [`from_bytes`] for invalid contents.
pub fn load_blob(path: impl AsRef<Path>) -> Result<Puzzle, SnapshotError> {
    let path = path.as_ref();
    debug!("loading puzzle snapshot from {}", path.display());
    from_bytes(&fs::read(path)?)
}
