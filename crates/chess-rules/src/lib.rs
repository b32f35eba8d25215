//! Chess rules engine with identity-tracked pieces.
//!
//! This crate provides:
//! - [`Board`] - square-to-piece and piece-to-square views kept in step,
//!   with reversible mutation through [`Board::make`] and [`Board::unmake`]
//! - [`MoveOracle`] - geometric move legality for a lone mover
//! - [`rules`] - king safety, castling, checkmate and stalemate
//! - [`Game`] - the turn-taking state machine, with [`GameSignals`] for observers
//! - [`HistoryPlayer`] - replaying a recorded game from any point
//! - [`pgn`] - reading and writing Portable Game Notation
//!
//! Every piece keeps its identity for the whole game: the queen's knight is
//! a different piece from the king's knight, and a promoted queen gets an
//! ordinal of its own.
//!
//! # Example
//!
//! ```
//! use chess_rules::{Color, Game, GameStatus};
//!
//! let mut game = Game::new();
//! for m in ["e2e4", "e7e5", "d1h5", "b8c6", "f1c4", "g8f6", "h5f7"] {
//!     game.apply_str(m).unwrap();
//! }
//! assert_eq!(game.status(), GameStatus::Checkmate { winner: Color::White });
//! assert_eq!(game.history().last().unwrap().san(), "Qxf7#");
//! ```

mod board;
mod capturables;
mod config;
mod game;
mod history;
mod mutator;
pub mod oracle;
pub mod pgn;
mod played_move;
pub mod rules;
mod signals;

pub use board::Board;
pub use capturables::Capturables;
pub use config::{ConfigError, GameConfig, PromotionDefaults};
pub use game::{Game, GameStatus, MoveError, MoveOutcome};
pub use history::{HistoryPlayer, PlayResult};
pub use mutator::{Speculation, Undo};
pub use oracle::MoveOracle;
pub use pgn::{parse_pgn, write_pgn, PgnError, PgnGame};
pub use played_move::{Disambiguation, PlayedMove};
pub use rules::{CastlingRefusal, CastlingRights};
pub use signals::{Event, GameSignals, MoveSnapshot, Signal};

pub use chess_core::{Color, Fen, FenError, ParseError, Piece, PieceKind, Proposal, Square};
