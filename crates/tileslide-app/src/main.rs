//! Text-mode sliding-tile puzzle.
//!
//! Starts a shuffled puzzle and reads one line per turn. A line is either
//! a command or the coordinates of the tile to slide:
//!
//! - `X Y` — slide the tile at column `X`, row `Y` (zero-based) toward the
//!   blank; tiles further along the blank's row or column drag everything
//!   between with them
//! - `Undo` — take back the last turn
//! - `Save` — write the session to a `.slide` document (filename prompted)
//! - `Load` — replace the session with a saved `.slide` document
//!
//! The grid is printed after every state-changing action; solving the
//! puzzle ends the program.
//!
//! # Usage
//!
//! ```sh
//! cargo run --bin tileslide -- 4 4
//! ```

use std::{
    io::{self, BufRead as _, Lines, StdinLock},
    process,
};

use clap::Parser;
use log::info;
use tileslide_codec::text;
use tileslide_core::Position;
use tileslide_game::Puzzle;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Puzzle width in tiles.
    #[arg(value_name = "WIDTH", default_value_t = 4)]
    width: usize,

    /// Puzzle height in tiles.
    #[arg(value_name = "HEIGHT", default_value_t = 4)]
    height: usize,
}

fn main() -> io::Result<()> {
    better_panic::install();
    env_logger::init();

    let args = Args::parse();
    let mut puzzle = match Puzzle::new(args.width, args.height) {
        Ok(puzzle) => puzzle,
        Err(error) => {
            eprintln!("{error}");
            process::exit(2);
        }
    };
    puzzle.shuffle();
    info!("started a {}x{} puzzle", args.width, args.height);
    println!("\n{}\n", puzzle.grid());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut solved = false;
    while !solved {
        let Some(line) = lines.next() else {
            // Input closed before the puzzle was solved.
            return Ok(());
        };
        let line = line?;
        match line.trim() {
            "Undo" => {
                if puzzle.history_empty() {
                    println!("Can't undo");
                } else if let Err(error) = puzzle.undo() {
                    println!("{error}");
                } else {
                    println!("\n{}\n", puzzle.grid());
                }
            }
            "Save" => {
                let Some(path) = prompt_filename(&mut lines)? else {
                    return Ok(());
                };
                match text::save_text(&path, &puzzle) {
                    Ok(()) => println!("Saved to {path}"),
                    Err(error) => println!("Failed to save: {error}"),
                }
            }
            "Load" => {
                let Some(path) = prompt_filename(&mut lines)? else {
                    return Ok(());
                };
                // The current session is replaced only if the whole
                // document loads.
                match text::load_text(&path) {
                    Ok(loaded) => {
                        puzzle = loaded;
                        println!("Loaded from {path}");
                        println!("\n{}\n", puzzle.grid());
                    }
                    Err(error) => println!("Failed to load: {error}"),
                }
            }
            input => match parse_query(input) {
                Some(position) => match puzzle.query_tile(position) {
                    Ok(now_solved) => {
                        solved = now_solved;
                        println!("\n{}\n", puzzle.grid());
                    }
                    Err(error) => println!("{error}"),
                },
                None => println!("Enter a tile as two numbers, or Undo, Save, Load"),
            },
        }
    }
    println!("You solved it!");
    Ok(())
}

/// Asks for a save-file name and appends the `.slide` extension.
fn prompt_filename(lines: &mut Lines<StdinLock<'_>>) -> io::Result<Option<String>> {
    println!("What filename?");
    let Some(line) = lines.next() else {
        return Ok(None);
    };
    Ok(Some(format!("{}.slide", line?.trim())))
}

/// Parses a tile query of the form `X Y`.
fn parse_query(input: &str) -> Option<Position> {
    let mut parts = input.split_whitespace();
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Position::new(x, y))
}
