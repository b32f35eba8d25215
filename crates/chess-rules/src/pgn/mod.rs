//! PGN (Portable Game Notation) reading and writing.
//!
//! [`parse_pgn`] reads every game in a text; [`PgnGame::to_pgn`] and
//! [`write_pgn`] write them back. Move text is standard algebraic notation
//! as produced by [`encode_ply`].
//!
//! Reading is tolerant of what real files contain: comments, recursive
//! variations, numeric annotation glyphs, `!?` suffixes and `%` escape
//! lines are skipped.

mod decode;
mod encode;
mod lexer;
mod san;
mod tags;

pub use encode::{encode_moves, encode_ply};
pub use tags::{Tags, SEVEN_TAG_ROSTER};

use crate::board::Board;
use crate::game::{Game, GameStatus};
use crate::history::HistoryPlayer;
use crate::played_move::PlayedMove;
use crate::rules::CastlingRights;
use chess_core::{Color, FenError};
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Longest move-text line written.
const LINE_WIDTH: usize = 80;

/// Errors raised while reading PGN text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PgnError {
    #[error("line {line}: unterminated tag")]
    UnterminatedTag { line: usize },

    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("game {game}, line {line}: not a move: {token:?}")]
    InvalidToken { game: usize, line: usize, token: String },

    #[error("game {game}: invalid FEN tag: {source}")]
    InvalidFen { game: usize, source: FenError },

    /// A well-formed token that does not fit the position.
    #[error("game {game}, ply {ply} ({token}): {reason}\n{board}{}", list_attempts(.attempts))]
    Decode {
        game: usize,
        ply: usize,
        token: String,
        reason: String,
        /// The position the token was read against.
        board: String,
        /// Candidates that were considered and why each was dropped.
        attempts: Vec<String>,
    },
}

fn list_attempts(attempts: &[String]) -> String {
    if attempts.is_empty() {
        String::new()
    } else {
        format!("\ntried:\n  {}", attempts.join("\n  "))
    }
}

/// One game read from, or bound for, a PGN text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgnGame {
    pub tags: Tags,
    pub initial: Board,
    pub initial_player: Color,
    pub initial_rights: CastlingRights,
    pub moves: Vec<PlayedMove>,
    /// The termination marker that closed the move text, if any.
    pub result: Option<String>,
}

impl PgnGame {
    /// A game from the standard position with no tags.
    pub fn new(moves: Vec<PlayedMove>) -> Self {
        PgnGame {
            tags: Tags::new(),
            initial: Board::new(),
            initial_player: Color::White,
            initial_rights: CastlingRights::ALL,
            moves,
            result: None,
        }
    }

    /// Captures a game's history and outcome.
    ///
    /// A game that did not start from the standard position gets `SetUp`
    /// and `FEN` tags.
    pub fn from_game(game: &Game) -> Self {
        let result = match game.status() {
            GameStatus::Ongoing => "*",
            GameStatus::Stalemate => "1/2-1/2",
            GameStatus::Checkmate { winner } | GameStatus::Resigned { winner } => winner.win_marker(),
        };

        let mut tags = Tags::new();
        tags.set("Result", result);
        let standard_start = *game.initial_board() == Board::new()
            && game.initial_player() == Color::White
            && game.initial_castling_rights() == CastlingRights::ALL;
        if !standard_start {
            tags.set("SetUp", "1");
            tags.set(
                "FEN",
                game.initial_board()
                    .to_fen(game.initial_player(), game.initial_castling_rights()),
            );
        }

        PgnGame {
            tags,
            initial: game.initial_board().clone(),
            initial_player: game.initial_player(),
            initial_rights: game.initial_castling_rights(),
            moves: game.history().to_vec(),
            result: Some(result.to_string()),
        }
    }

    /// The result marker to write: the last move's, else the recorded one.
    pub fn result_str(&self) -> &str {
        if let Some(token) = self.moves.last().and_then(encode::result_token) {
            return token;
        }
        self.result
            .as_deref()
            .or_else(|| self.tags.result())
            .unwrap_or("*")
    }

    /// Numbered move text ending in a result marker, one line per full move.
    pub fn movetext(&self) -> String {
        let mut text = encode_moves(&self.moves, self.initial_player);
        let terminal = self.moves.last().is_some_and(PlayedMove::is_terminal);
        if !terminal {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(self.result_str());
        }
        text
    }

    /// Renders the game as a complete PGN record.
    pub fn to_pgn(&self) -> String {
        let mut tags = self.tags.clone();
        tags.set("Result", self.result_str());
        format!("{}\n{}\n", tags.to_pgn(), encode::wrap(&self.movetext(), LINE_WIDTH))
    }

    /// A replayer positioned on the last move.
    pub fn history_player(&self) -> HistoryPlayer {
        HistoryPlayer::from_position(self.initial.clone(), self.moves.clone())
    }

    /// The position after every move.
    pub fn final_board(&self) -> Board {
        self.history_player().current().board
    }
}

/// Reads every game in `text`, decoding each one independently.
///
/// Lexical errors, such as an unterminated tag, abort the whole read. A
/// game whose moves do not decode yields its own error and the rest are
/// still returned.
pub fn decode_games(text: &str) -> Result<Vec<Result<PgnGame, PgnError>>, PgnError> {
    let raw_games = lexer::split_games(lexer::tokenize(text)?);
    let games: Vec<_> = raw_games
        .into_iter()
        .enumerate()
        .map(|(i, raw)| {
            let result = decode::decode_game(i + 1, raw);
            if let Err(e) = &result {
                warn!(game = i + 1, error = %e, "game failed to decode");
            }
            result
        })
        .collect();
    debug!(games = games.len(), "read PGN text");
    Ok(games)
}

/// Reads every game in `text`, failing on the first game that does not decode.
pub fn parse_pgn(text: &str) -> Result<Vec<PgnGame>, PgnError> {
    decode_games(text)?.into_iter().collect()
}

/// Writes `games` to `path`, separated by blank lines.
pub fn write_pgn<P: AsRef<Path>>(path: P, games: &[PgnGame]) -> std::io::Result<()> {
    let mut out = BufWriter::new(std::fs::File::create(path)?);
    for (i, game) in games.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        out.write_all(game.to_pgn().as_bytes())?;
    }
    out.flush()
}
