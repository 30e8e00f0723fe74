//! Persistence for sliding-tile puzzle sessions.
//!
//! Two independent formats, both capturing the full session (dimensions,
//! tiles, and turn history) and both rebuilding it through the engine's
//! validated [`Puzzle::from_parts`](tileslide_game::Puzzle::from_parts):
//!
//! - [`text`]: a structured, human-readable XML-like document with a
//!   hand-rolled tokenizer and parser
//! - [`snapshot`]: an opaque binary blob with a private layout
//!
//! Loading is atomic in both: a malformed file produces a typed error and
//! no state, so a caller's existing puzzle is never corrupted by a failed
//! load.

pub mod snapshot;
pub mod text;
