//! Chess piece representation.
//!
//! A [`PieceKind`] is one of the six kinds of chess men. A [`Piece`] is an
//! identity on the board: kind, color, and an ordinal telling apart pieces
//! of the same kind and color. Two white queens with different ordinals are
//! different pieces.

use crate::geometry::{
    Ray, BISHOP_RAYS, BLACK_PAWN_RAYS, KING_RAYS, KNIGHT_RAYS, QUEEN_RAYS, ROOK_RAYS,
    WHITE_PAWN_RAYS,
};
use crate::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The six kinds of chess pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    /// All piece kinds in order.
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Kinds a pawn may promote to.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    /// Returns the index of this kind (0-5).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Point value of the piece.
    pub const fn worth(self) -> u32 {
        match self {
            PieceKind::Pawn => 1,
            PieceKind::Knight | PieceKind::Bishop => 3,
            PieceKind::Rook => 5,
            PieceKind::Queen => 9,
            PieceKind::King => 10,
        }
    }

    /// Returns true if this piece is a sliding piece (bishop, rook, or queen).
    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }

    /// Returns true if a pawn may promote to this kind.
    #[inline]
    pub const fn is_promotion_target(self) -> bool {
        matches!(
            self,
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen
        )
    }

    /// Upper-case letter used in move text (`P` for pawns, which move text omits).
    pub const fn san_char(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    /// Parses an upper-case move-text letter.
    pub const fn from_san_char(c: char) -> Option<Self> {
        match c {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Returns the FEN character for this kind with the given color.
    pub const fn to_fen_char(self, color: Color) -> char {
        let c = self.san_char();
        match color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    /// Parses a FEN character into a kind and color.
    pub const fn from_fen_char(c: char) -> Option<(PieceKind, Color)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        match PieceKind::from_san_char(c.to_ascii_uppercase()) {
            Some(kind) => Some((kind, color)),
            None => None,
        }
    }

    /// Movement rays for this kind. Pawn rays depend on the mover's color.
    pub const fn rays(self, color: Color) -> &'static [Ray] {
        match self {
            PieceKind::Pawn => match color {
                Color::White => &WHITE_PAWN_RAYS,
                Color::Black => &BLACK_PAWN_RAYS,
            },
            PieceKind::Knight => &KNIGHT_RAYS,
            PieceKind::Bishop => &BISHOP_RAYS,
            PieceKind::Rook => &ROOK_RAYS,
            PieceKind::Queen => &QUEEN_RAYS,
            PieceKind::King => &KING_RAYS,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceKind::Pawn => "Pawn",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Rook => "Rook",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
        };
        write!(f, "{}", name)
    }
}

/// An identity-bearing chess man.
///
/// Pawns carry ordinals 0-7 by starting file; other starting pieces carry 0
/// or 1 counted from the a-side. Kings are always ordinal 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub ordinal: u8,
}

impl Piece {
    #[inline]
    pub const fn new(kind: PieceKind, color: Color, ordinal: u8) -> Self {
        Piece {
            kind,
            color,
            ordinal,
        }
    }

    /// The king of `color`.
    #[inline]
    pub const fn king(color: Color) -> Self {
        Piece::new(PieceKind::King, color, 0)
    }

    /// Rank on which this piece stands in the initial position.
    pub const fn initial_rank(self) -> u8 {
        match self.kind {
            PieceKind::Pawn => self.color.pawn_rank(),
            _ => self.color.back_rank(),
        }
    }

    #[inline]
    pub const fn worth(self) -> u32 {
        self.kind.worth()
    }

    #[inline]
    pub const fn rays(self) -> &'static [Ray] {
        self.kind.rays(self.color)
    }

    #[inline]
    pub const fn is_king(self) -> bool {
        matches!(self.kind, PieceKind::King)
    }

    #[inline]
    pub const fn is_pawn(self) -> bool {
        matches!(self.kind, PieceKind::Pawn)
    }

    /// FEN letter for this piece.
    #[inline]
    pub const fn fen_char(self) -> char {
        self.kind.to_fen_char(self.color)
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} #{}", self.color, self.kind, self.ordinal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn kind_to_fen() {
        assert_eq!(PieceKind::Pawn.to_fen_char(Color::White), 'P');
        assert_eq!(PieceKind::Pawn.to_fen_char(Color::Black), 'p');
        assert_eq!(PieceKind::King.to_fen_char(Color::White), 'K');
        assert_eq!(PieceKind::Knight.to_fen_char(Color::Black), 'n');
    }

    #[test]
    fn kind_from_fen() {
        assert_eq!(
            PieceKind::from_fen_char('P'),
            Some((PieceKind::Pawn, Color::White))
        );
        assert_eq!(
            PieceKind::from_fen_char('q'),
            Some((PieceKind::Queen, Color::Black))
        );
        assert_eq!(PieceKind::from_fen_char('x'), None);
    }

    #[test]
    fn worth_table() {
        let worth: Vec<u32> = PieceKind::ALL.iter().map(|k| k.worth()).collect();
        assert_eq!(worth, vec![1, 3, 3, 5, 9, 10]);
    }

    #[test]
    fn is_slider() {
        assert!(!PieceKind::Pawn.is_slider());
        assert!(!PieceKind::Knight.is_slider());
        assert!(PieceKind::Bishop.is_slider());
        assert!(PieceKind::Rook.is_slider());
        assert!(PieceKind::Queen.is_slider());
        assert!(!PieceKind::King.is_slider());
    }

    #[test]
    fn initial_ranks() {
        assert_eq!(Piece::new(PieceKind::Rook, Color::White, 0).initial_rank(), 0);
        assert_eq!(Piece::new(PieceKind::Rook, Color::Black, 1).initial_rank(), 7);
        assert_eq!(Piece::new(PieceKind::Pawn, Color::White, 3).initial_rank(), 1);
        assert_eq!(Piece::new(PieceKind::Pawn, Color::Black, 3).initial_rank(), 6);
    }

    #[test]
    fn pawn_rays_follow_color() {
        let white = Piece::new(PieceKind::Pawn, Color::White, 0);
        let black = Piece::new(PieceKind::Pawn, Color::Black, 0);
        assert_eq!(white.rays().len(), 3);
        assert!(white.rays().iter().all(|r| r.dy == 1));
        assert!(black.rays().iter().all(|r| r.dy == -1));
    }

    #[test]
    fn identity_includes_ordinal() {
        let q0 = Piece::new(PieceKind::Queen, Color::White, 0);
        let q1 = Piece::new(PieceKind::Queen, Color::White, 1);
        assert_ne!(q0, q1);
        let set: HashSet<Piece> = [q0, q1, q0].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert_eq!(Piece::king(Color::Black).ordinal, 0);
    }

    #[test]
    fn display() {
        let q = Piece::new(PieceKind::Queen, Color::White, 1);
        assert_eq!(q.to_string(), "White Queen #1");
    }
}
