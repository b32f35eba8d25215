//! History records.

use chess_core::{Color, Piece, Square};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Extra source information needed when another piece of the same kind and
/// color could have reached the same destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Disambiguation {
    File(char),
    Rank(char),
    Square(Square),
}

impl Disambiguation {
    /// Returns true if a piece standing on `sq` matches this hint.
    pub fn matches(self, sq: Square) -> bool {
        match self {
            Disambiguation::File(c) => sq.file_char() == c,
            Disambiguation::Rank(c) => sq.rank_char() == c,
            Disambiguation::Square(s) => s == sq,
        }
    }
}

impl fmt::Display for Disambiguation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disambiguation::File(c) | Disambiguation::Rank(c) => write!(f, "{}", c),
            Disambiguation::Square(sq) => write!(f, "{}", sq),
        }
    }
}

/// One accepted ply, with everything needed to replay or notate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedMove {
    /// The piece that moved; for castling, the king.
    pub piece: Piece,
    pub src: Square,
    pub dst: Square,
    pub captured: Option<Piece>,
    pub is_castling: bool,
    pub is_king_side_castle: bool,
    pub disambiguation: Option<Disambiguation>,
    /// The piece that replaced the pawn on arrival.
    pub promoted: Option<Piece>,
    pub is_check: bool,
    pub is_mate: bool,
    /// Set on the final move of a decided game.
    pub winner: Option<Color>,
    /// Set on the final move of a drawn game.
    #[serde(default)]
    pub is_draw: bool,
}

impl PlayedMove {
    /// A plain move with no capture, promotion, or check.
    pub fn new(piece: Piece, src: Square, dst: Square) -> Self {
        PlayedMove {
            piece,
            src,
            dst,
            captured: None,
            is_castling: false,
            is_king_side_castle: false,
            disambiguation: None,
            promoted: None,
            is_check: false,
            is_mate: false,
            winner: None,
            is_draw: false,
        }
    }

    /// A castling move, recorded as the king's journey.
    pub fn castling(king: Piece, src: Square, dst: Square, king_side: bool) -> Self {
        PlayedMove {
            is_castling: true,
            is_king_side_castle: king_side,
            ..PlayedMove::new(king, src, dst)
        }
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.piece.color
    }

    /// Returns true if this move ended the game.
    pub fn is_terminal(&self) -> bool {
        self.winner.is_some() || self.is_draw
    }

    /// The move in standard algebraic notation, check and mate markers included.
    pub fn san(&self) -> String {
        crate::pgn::encode_ply(self)
    }
}

impl fmt::Display for PlayedMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.san())
    }
}
