//! Core types for chess.
//!
//! This crate provides the value types shared by the rules engine:
//! - [`Color`] for the two players
//! - [`Square`] for board coordinates, with dual `(x, y)` / `e4` forms
//! - [`PieceKind`] and the identity-bearing [`Piece`]
//! - [`Ray`] movement tables for every kind
//! - [`Proposal`] for a requested move such as `e2e4`
//! - FEN position parsing

mod color;
mod error;
mod fen;
pub mod geometry;
mod piece;
mod proposal;
mod square;

pub use color::Color;
pub use error::ParseError;
pub use fen::{format_placement, Fen, FenError};
pub use geometry::Ray;
pub use piece::{Piece, PieceKind};
pub use proposal::Proposal;
pub use square::Square;
