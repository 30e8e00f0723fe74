//! Sliding-tile puzzle engine.
//!
//! This crate provides the [`Puzzle`] session type on top of
//! [`tileslide_core`]: shuffling into a solvable random arrangement,
//! single- and multi-tile slides grouped into undoable turns, undo, and
//! solved-state detection.
//!
//! Front ends hold a `Puzzle`, call [`Puzzle::shuffle`] once, feed player
//! taps to [`Puzzle::query_tile`], and redraw from [`Puzzle::grid`] after
//! every call; the codec crate reconstructs sessions with
//! [`Puzzle::from_parts`].

pub mod error;
pub mod puzzle;

pub use self::{error::PuzzleError, puzzle::Puzzle};
