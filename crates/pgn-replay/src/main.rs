//! pgn-replay - Step through a game from a PGN file.
//!
//! Decodes the file, moves a history cursor to the requested ply, and prints
//! the board there together with the move that led to it and the game's
//! move text as it would be written back out.

use anyhow::{bail, Context, Result};
use chess_rules::pgn::decode_games;
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;

/// Step through a game from a PGN file.
#[derive(Parser)]
#[command(name = "pgn-replay")]
#[command(about = "Prints the board at any point of a game stored in a PGN file")]
struct Args {
    /// PGN file to read
    file: PathBuf,

    /// Game to show, counting from 1
    #[arg(long, default_value = "1")]
    game: usize,

    /// Number of plies to replay; 0 shows the starting position (default: all)
    #[arg(long)]
    ply: Option<usize>,

    /// Log decoding progress
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let mut games = decode_games(&text).with_context(|| format!("failed to parse {}", args.file.display()))?;
    tracing::info!(file = %args.file.display(), games = games.len(), "read PGN file");

    if args.game == 0 || args.game > games.len() {
        bail!(
            "{} holds {} game(s); there is no game {}",
            args.file.display(),
            games.len(),
            args.game
        );
    }
    let game = games
        .swap_remove(args.game - 1)
        .with_context(|| format!("failed to decode game {}", args.game))?;

    let mut player = game.history_player();
    let position = match args.ply {
        Some(ply) => player.seek(ply as isize - 1),
        None => player.current(),
    };

    println!(
        "{} vs {} ({})",
        game.tags.white().unwrap_or("?"),
        game.tags.black().unwrap_or("?"),
        game.result_str()
    );
    println!();
    println!("{}", position.board);
    println!();
    match &position.played {
        Some(played) => println!("ply {} of {}: {}", player.cursor() + 1, player.len(), played),
        None => println!("starting position, {} plies recorded", player.len()),
    }
    println!();
    println!("{}", game.movetext());
    Ok(())
}
