//! Structured text encoding of puzzle state.
//!
//! A puzzle is written as a small XML-like document: one `dimensions`
//! pair, one `row` group per grid row (comma-separated cell tokens, `_`
//! for the blank), and one `history` section of `turn` groups each holding
//! `move` groups of four integers:
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <puzzle>
//! <dimensions>3,3</dimensions>
//! <row>1,2,3</row>
//! <row>4,5,6</row>
//! <row>7,_,8</row>
//! <history>
//! <turn>
//! <move>1,2,2,2</move>
//! </turn>
//! </history>
//! </puzzle>
//! ```
//!
//! The grammar is deliberately minimal, so decoding is a hand-rolled token
//! stream rather than a general XML parser: tags and text runs are pulled
//! off one at a time and dispatched on the tag label. Sections may appear
//! in any order; anything outside the documented structure fails with a
//! [`ParseError`] and no state is produced.

use std::{
    fmt, fs,
    io::{self, Write as _},
    path::Path,
};

use log::debug;
use tileslide_core::{Grid, History, Move, Position, Tile, Turn};
use tileslide_game::{Puzzle, PuzzleError};

const DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";
const TAG_PUZZLE: &str = "puzzle";
const TAG_DIMENSIONS: &str = "dimensions";
const TAG_ROW: &str = "row";
const TAG_HISTORY: &str = "history";
const TAG_TURN: &str = "turn";
const TAG_MOVE: &str = "move";
const BLANK_TOKEN: &str = "_";

/// Errors raised while decoding a puzzle document.
#[derive(
    Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From,
)]
pub enum ParseError {
    /// The document ended in the middle of a construct.
    #[display("document ended unexpectedly")]
    UnexpectedEof,
    /// A `<` was never matched by a `>`.
    #[display("tag starting at byte {at} is never closed")]
    #[from(skip)]
    UnclosedTag {
        /// Byte offset of the opening `<`.
        at: usize,
    },
    /// A tag or text run that the grammar does not allow here.
    #[display("unexpected {token}")]
    #[from(skip)]
    UnexpectedToken {
        /// Rendering of the offending token.
        token: String,
    },
    /// A cell token that is neither a tile number nor the blank marker.
    #[display("invalid cell token {token:?}")]
    #[from(skip)]
    InvalidCell {
        /// The offending token.
        token: String,
    },
    /// A token that should have been a non-negative integer.
    #[display("invalid number {token:?}")]
    #[from(skip)]
    InvalidNumber {
        /// The offending token.
        token: String,
    },
    /// A comma-separated group with the wrong number of values.
    #[display("expected {expected} comma-separated values, got {actual}")]
    #[from(skip)]
    ValueCount {
        /// Values required by the construct.
        expected: usize,
        /// Values found.
        actual: usize,
    },
    /// A section that must appear exactly once appeared again.
    #[display("duplicate <{name}> section")]
    #[from(skip)]
    DuplicateSection {
        /// The section label.
        name: &'static str,
    },
    /// A section that must appear exactly once never appeared.
    #[display("missing <{name}> section")]
    #[from(skip)]
    MissingSection {
        /// The section label.
        name: &'static str,
    },
    /// The number of row groups does not match the declared height.
    #[display("expected {expected} rows, got {actual}")]
    #[from(skip)]
    RowCount {
        /// Rows required by the dimensions.
        expected: usize,
        /// Rows found.
        actual: usize,
    },
    /// A row group whose cell count does not match the declared width.
    #[display("row {row} holds {actual} cells, expected {expected}")]
    #[from(skip)]
    RowWidth {
        /// Zero-based row index.
        row: usize,
        /// Cells required by the dimensions.
        expected: usize,
        /// Cells found.
        actual: usize,
    },
    /// Content found after the closing puzzle tag.
    #[display("content after the closing </puzzle> tag")]
    TrailingContent,
    /// The document parsed but does not describe a valid puzzle state.
    #[display("{_0}")]
    State(#[from] PuzzleError),
}

/// Errors raised by the text persistence paths.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum TextError {
    /// Reading or writing the file failed.
    #[display("i/o error: {_0}")]
    Io(#[from] io::Error),
    /// The file's contents are not a valid puzzle document.
    #[display("{_0}")]
    Parse(#[from] ParseError),
}

/// Encodes a puzzle as a text document.
///
/// Rows are written top-to-bottom, turns oldest-first, and moves in
/// execution order, so [`decode`] rebuilds an identical session.
#[must_use]
#[expect(clippy::missing_panics_doc)]
pub fn encode(puzzle: &Puzzle) -> String {
    let mut out = String::new();
    write_document(&mut out, puzzle).expect("writing to a String cannot fail");
    out
}

fn write_document<W: fmt::Write>(out: &mut W, puzzle: &Puzzle) -> fmt::Result {
    let grid = puzzle.grid();
    writeln!(out, "{DECLARATION}")?;
    writeln!(out, "<{TAG_PUZZLE}>")?;
    writeln!(
        out,
        "<{TAG_DIMENSIONS}>{},{}</{TAG_DIMENSIONS}>",
        grid.width(),
        grid.height()
    )?;
    for row in grid.rows() {
        write!(out, "<{TAG_ROW}>")?;
        for (x, cell) in row.iter().enumerate() {
            if x > 0 {
                write!(out, ",")?;
            }
            match cell {
                Some(tile) => write!(out, "{tile}")?,
                None => write!(out, "{BLANK_TOKEN}")?,
            }
        }
        writeln!(out, "</{TAG_ROW}>")?;
    }
    writeln!(out, "<{TAG_HISTORY}>")?;
    for turn in puzzle.history().turns() {
        writeln!(out, "<{TAG_TURN}>")?;
        for mv in turn.moves() {
            writeln!(
                out,
                "<{TAG_MOVE}>{},{},{},{}</{TAG_MOVE}>",
                mv.a().x(),
                mv.a().y(),
                mv.b().x(),
                mv.b().y()
            )?;
        }
        writeln!(out, "</{TAG_TURN}>")?;
    }
    writeln!(out, "</{TAG_HISTORY}>")?;
    writeln!(out, "</{TAG_PUZZLE}>")
}

/// Decodes a puzzle from a text document.
///
/// # Errors
///
/// Returns a [`ParseError`] if the document deviates from the grammar, is
/// truncated, or describes an invalid puzzle state. Failure is atomic: no
/// partially-populated puzzle is ever returned.
pub fn decode(input: &str) -> Result<Puzzle, ParseError> {
    let mut tokens = Tokenizer::new(input);

    match tokens.next_required()? {
        Token::Open(TAG_PUZZLE) => {}
        other => return Err(other.into_unexpected()),
    }

    let mut dimensions = None;
    let mut rows: Vec<Vec<Option<Tile>>> = Vec::new();
    let mut turns = None;
    loop {
        match tokens.next_required()? {
            Token::Open(TAG_DIMENSIONS) => {
                if dimensions.is_some() {
                    return Err(ParseError::DuplicateSection {
                        name: TAG_DIMENSIONS,
                    });
                }
                let [width, height] = parse_numbers(tokens.expect_text()?)?;
                tokens.expect_close(TAG_DIMENSIONS)?;
                dimensions = Some((width, height));
            }
            Token::Open(TAG_ROW) => {
                let row = parse_row(tokens.expect_text()?)?;
                tokens.expect_close(TAG_ROW)?;
                rows.push(row);
            }
            Token::Open(TAG_HISTORY) => {
                if turns.is_some() {
                    return Err(ParseError::DuplicateSection { name: TAG_HISTORY });
                }
                turns = Some(parse_history(&mut tokens)?);
            }
            Token::Close(TAG_PUZZLE) => break,
            other => return Err(other.into_unexpected()),
        }
    }
    if tokens.next()?.is_some() {
        return Err(ParseError::TrailingContent);
    }

    let (width, height) = dimensions.ok_or(ParseError::MissingSection {
        name: TAG_DIMENSIONS,
    })?;
    let turns = turns.ok_or(ParseError::MissingSection { name: TAG_HISTORY })?;

    if rows.len() != height {
        return Err(ParseError::RowCount {
            expected: height,
            actual: rows.len(),
        });
    }
    // Sizing by actual rows, not the declared dimensions: a hostile
    // dimensions pair must fail validation, not abort an allocation.
    let mut cells = Vec::new();
    for (y, row) in rows.into_iter().enumerate() {
        if row.len() != width {
            return Err(ParseError::RowWidth {
                row: y,
                expected: width,
                actual: row.len(),
            });
        }
        cells.extend(row);
    }

    let grid = Grid::from_cells(width, height, cells).map_err(PuzzleError::from)?;
    Ok(Puzzle::from_parts(grid, History::from(turns))?)
}

/// Writes a puzzle document to a file.
///
/// # Errors
///
/// Returns [`TextError::Io`] if the file cannot be created or written.
pub fn save_text(path: impl AsRef<Path>, puzzle: &Puzzle) -> Result<(), TextError> {
    let path = path.as_ref();
    debug!("saving puzzle document to {}", path.display());
    let mut file = io::BufWriter::new(fs::File::create(path)?);
    file.write_all(encode(puzzle).as_bytes())?;
    file.flush()?;
    Ok(())
}

/// Reads a puzzle document from a file.
///
/// A failed load returns an error and nothing else; any puzzle the caller
/// already holds is untouched.
///
/// # Errors
///
/// Returns [`TextError::Io`] if the file cannot be read and
/// [`TextError::Parse`] if its contents are not a valid puzzle document.
pub fn load_text(path: impl AsRef<Path>) -> Result<Puzzle, TextError> {
    let path = path.as_ref();
    debug!("loading puzzle document from {}", path.display());
    let input = fs::read_to_string(path)?;
    Ok(decode(&input)?)
}

fn parse_history(tokens: &mut Tokenizer<'_>) -> Result<Vec<Turn>, ParseError> {
    let mut turns = Vec::new();
    loop {
        match tokens.next_required()? {
            Token::Open(TAG_TURN) => turns.push(parse_turn(tokens)?),
            Token::Close(TAG_HISTORY) => return Ok(turns),
            other => return Err(other.into_unexpected()),
        }
    }
}

fn parse_turn(tokens: &mut Tokenizer<'_>) -> Result<Turn, ParseError> {
    let mut turn = Turn::new();
    loop {
        match tokens.next_required()? {
            Token::Open(TAG_MOVE) => {
                let [x1, y1, x2, y2] = parse_numbers(tokens.expect_text()?)?;
                tokens.expect_close(TAG_MOVE)?;
                turn.push(Move::new(Position::new(x1, y1), Position::new(x2, y2)));
            }
            Token::Close(TAG_TURN) => return Ok(turn),
            other => return Err(other.into_unexpected()),
        }
    }
}

fn parse_numbers<const N: usize>(text: &str) -> Result<[usize; N], ParseError> {
    let values: Vec<usize> = text
        .split(',')
        .map(|token| {
            let token = token.trim();
            token.parse().map_err(|_| ParseError::InvalidNumber {
                token: token.to_owned(),
            })
        })
        .collect::<Result<_, _>>()?;
    let actual = values.len();
    values.try_into().map_err(|_| ParseError::ValueCount {
        expected: N,
        actual,
    })
}

fn parse_row(text: &str) -> Result<Vec<Option<Tile>>, ParseError> {
    text.split(',')
        .map(|token| {
            let token = token.trim();
            if token == BLANK_TOKEN {
                return Ok(None);
            }
            token
                .parse()
                .ok()
                .and_then(Tile::new)
                .map(Some)
                .ok_or_else(|| ParseError::InvalidCell {
                    token: token.to_owned(),
                })
        })
        .collect()
}

/// One lexical element of a puzzle document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    /// `<name>`
    Open(&'a str),
    /// `</name>`
    Close(&'a str),
    /// A run of text between tags, surrounding whitespace stripped.
    Text(&'a str),
}

impl Token<'_> {
    fn into_unexpected(self) -> ParseError {
        let token = match self {
            Token::Open(name) => format!("<{name}>"),
            Token::Close(name) => format!("</{name}>"),
            Token::Text(text) => format!("text {text:?}"),
        };
        ParseError::UnexpectedToken { token }
    }
}

/// Streaming tokenizer over a puzzle document.
struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Returns the next token, or `None` at the end of the document.
    ///
    /// XML declarations (`<?` .. `?>`) are skipped wherever they appear.
    fn next(&mut self) -> Result<Option<Token<'a>>, ParseError> {
        loop {
            let rest = self.input[self.pos..].trim_start();
            self.pos = self.input.len() - rest.len();
            if rest.is_empty() {
                return Ok(None);
            }

            if let Some(tag) = rest.strip_prefix('<') {
                if let Some(declaration) = tag.strip_prefix('?') {
                    let end = declaration.find("?>").ok_or(ParseError::UnclosedTag {
                        at: self.pos,
                    })?;
                    self.pos += 1 + 1 + end + 2;
                    continue;
                }
                let end = tag.find('>').ok_or(ParseError::UnclosedTag { at: self.pos })?;
                let name = &tag[..end];
                self.pos += 1 + end + 1;
                return Ok(Some(match name.strip_prefix('/') {
                    Some(name) => Token::Close(name),
                    None => Token::Open(name),
                }));
            }

            let end = rest.find('<').unwrap_or(rest.len());
            let text = rest[..end].trim_end();
            self.pos += end;
            return Ok(Some(Token::Text(text)));
        }
    }

    /// Returns the next token, failing on end of input.
    fn next_required(&mut self) -> Result<Token<'a>, ParseError> {
        self.next()?.ok_or(ParseError::UnexpectedEof)
    }

    /// Consumes a text token and returns its contents.
    fn expect_text(&mut self) -> Result<&'a str, ParseError> {
        match self.next_required()? {
            Token::Text(text) => Ok(text),
            other => Err(other.into_unexpected()),
        }
    }

    /// Consumes the closing tag for `name`.
    fn expect_close(&mut self, name: &'static str) -> Result<(), ParseError> {
        match self.next_required()? {
            Token::Close(found) if found == name => Ok(()),
            other => Err(other.into_unexpected()),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64Mcg;
    use tileslide_core::GridError;

    use super::*;

    fn sample_puzzle() -> Puzzle {
        let cells = vec![Tile::new(1), None, Tile::new(3), Tile::new(2)];
        let grid = Grid::from_cells(2, 2, cells).unwrap();
        let turn = Turn::single(Move::new(Position::new(1, 1), Position::new(1, 0)));
        Puzzle::from_parts(grid, History::from(vec![turn])).unwrap()
    }

    #[test]
    fn test_encode_produces_the_documented_layout() {
        let document = encode(&sample_puzzle());
        assert_eq!(
            document,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <puzzle>\n\
             <dimensions>2,2</dimensions>\n\
             <row>1,_</row>\n\
             <row>3,2</row>\n\
             <history>\n\
             <turn>\n\
             <move>1,1,1,0</move>\n\
             </turn>\n\
             </history>\n\
             </puzzle>\n"
        );
    }

    #[test]
    fn test_round_trip_preserves_tiles_and_history() {
        let original = sample_puzzle();
        let decoded = decode(&encode(&original)).unwrap();

        assert_eq!(decoded, original);
        assert_eq!(decoded.history(), original.history());
    }

    #[test]
    fn test_round_trip_after_shuffle_and_play() {
        let mut original = Puzzle::new(4, 3).unwrap();
        original.shuffle_with(&mut Pcg64Mcg::seed_from_u64(42));
        for position in [
            Position::new(0, 0),
            Position::new(3, 2),
            Position::new(1, 1),
            Position::new(0, 2),
        ] {
            original.query_tile(position).unwrap();
        }

        let mut decoded = decode(&encode(&original)).unwrap();
        assert_eq!(decoded, original);
        assert_eq!(decoded.history(), original.history());

        // Undoing the decoded history retraces the original's grid states.
        while !original.history_empty() {
            original.undo().unwrap();
            decoded.undo().unwrap();
            assert_eq!(decoded.grid(), original.grid());
        }
        assert!(decoded.history_empty());
    }

    #[test]
    fn test_decode_accepts_documents_without_declaration() {
        let document = "<puzzle>\
                        <dimensions>2,2</dimensions>\
                        <row>1,2</row>\
                        <row>3,_</row>\
                        <history></history>\
                        </puzzle>";
        let puzzle = decode(document).unwrap();
        assert!(puzzle.is_solved());
        assert!(puzzle.history_empty());
    }

    #[test]
    fn test_decode_accepts_sections_in_any_order() {
        let document = "<puzzle>\
                        <history></history>\
                        <row>1,2</row>\
                        <row>3,_</row>\
                        <dimensions>2,2</dimensions>\
                        </puzzle>";
        assert!(decode(document).unwrap().is_solved());
    }

    #[test]
    fn test_decode_rejects_malformed_documents() {
        // Truncated mid-section
        assert_eq!(
            decode("<puzzle><dimensions"),
            Err(ParseError::UnclosedTag { at: 8 })
        );
        assert_eq!(
            decode("<puzzle><dimensions>3,3"),
            Err(ParseError::UnexpectedEof)
        );
        assert_eq!(
            decode("<puzzle><dimensions>3,3</dimensions>"),
            Err(ParseError::UnexpectedEof)
        );

        // Unknown tag
        assert_eq!(
            decode("<puzzle><board>1,2</board></puzzle>"),
            Err(ParseError::UnexpectedToken {
                token: "<board>".to_owned()
            })
        );

        // Bad cell tokens
        assert_eq!(
            decode("<puzzle><row>1,x</row></puzzle>"),
            Err(ParseError::InvalidCell {
                token: "x".to_owned()
            })
        );
        assert_eq!(
            decode("<puzzle><row>0,1</row></puzzle>"),
            Err(ParseError::InvalidCell {
                token: "0".to_owned()
            })
        );

        // Wrong number of dimension values
        assert_eq!(
            decode("<puzzle><dimensions>3</dimensions></puzzle>"),
            Err(ParseError::ValueCount {
                expected: 2,
                actual: 1
            })
        );

        // Duplicate and missing sections
        assert_eq!(
            decode(
                "<puzzle><dimensions>2,2</dimensions>\
                 <dimensions>2,2</dimensions></puzzle>"
            ),
            Err(ParseError::DuplicateSection {
                name: "dimensions"
            })
        );
        assert_eq!(
            decode("<puzzle><history></history></puzzle>"),
            Err(ParseError::MissingSection {
                name: "dimensions"
            })
        );
        assert_eq!(
            decode(
                "<puzzle><dimensions>2,2</dimensions>\
                 <row>1,2</row><row>3,_</row></puzzle>"
            ),
            Err(ParseError::MissingSection { name: "history" })
        );
    }

    #[test]
    fn test_decode_rejects_mismatched_grid_shape() {
        assert_eq!(
            decode(
                "<puzzle><dimensions>2,2</dimensions>\
                 <row>1,2</row><history></history></puzzle>"
            ),
            Err(ParseError::RowCount {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            decode(
                "<puzzle><dimensions>2,2</dimensions>\
                 <row>1,2,3</row><row>_</row><history></history></puzzle>"
            ),
            Err(ParseError::RowWidth {
                row: 0,
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn test_decode_rejects_invalid_states() {
        // Tile 3 appears twice
        assert_eq!(
            decode(
                "<puzzle><dimensions>2,2</dimensions>\
                 <row>1,3</row><row>3,_</row><history></history></puzzle>"
            ),
            Err(ParseError::State(PuzzleError::Grid(
                GridError::DuplicateTile { value: 3 }
            )))
        );

        // History move outside the grid
        let document = "<puzzle><dimensions>2,2</dimensions>\
                        <row>1,2</row><row>3,_</row>\
                        <history><turn><move>0,0,9,9</move></turn></history>\
                        </puzzle>";
        assert!(matches!(
            decode(document),
            Err(ParseError::State(PuzzleError::MoveOutOfBounds { .. }))
        ));
    }

    #[test]
    fn test_decode_rejects_trailing_content() {
        let mut document = encode(&sample_puzzle());
        document.push_str("<puzzle>");
        assert_eq!(decode(&document), Err(ParseError::TrailingContent));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "tileslide-text-{}.slide",
            std::process::id()
        ));
        let original = sample_puzzle();

        save_text(&path, &original).unwrap();
        let loaded = load_text(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(loaded, original);
        assert_eq!(loaded.history(), original.history());
    }

    #[test]
    fn test_load_missing_file_is_an_io_error() {
        let result = load_text("/nonexistent/tileslide.slide");
        assert!(matches!(result, Err(TextError::Io(_))));
    }
}
