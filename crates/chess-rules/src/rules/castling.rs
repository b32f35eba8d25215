//! Castling eligibility.

use super::{in_check, is_attacked};
use crate::board::{square, Board, CastleSquares};
use chess_core::{Color, Piece, PieceKind, Square};
use thiserror::Error;

/// Which castling moves are still possible, judged only by what has moved.
///
/// A king move loses both sides; a rook leaving its corner, or being taken
/// there, loses that side only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingRights(u8);

impl Default for CastlingRights {
    fn default() -> Self {
        CastlingRights::ALL
    }
}

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const ALL: CastlingRights = CastlingRights(0b1111);
    const WHITE_KINGSIDE: u8 = 0b0001;
    const WHITE_QUEENSIDE: u8 = 0b0010;
    const BLACK_KINGSIDE: u8 = 0b0100;
    const BLACK_QUEENSIDE: u8 = 0b1000;

    const fn flag(color: Color, king_side: bool) -> u8 {
        match (color, king_side) {
            (Color::White, true) => Self::WHITE_KINGSIDE,
            (Color::White, false) => Self::WHITE_QUEENSIDE,
            (Color::Black, true) => Self::BLACK_KINGSIDE,
            (Color::Black, false) => Self::BLACK_QUEENSIDE,
        }
    }

    /// Builds rights from FEN castling letters (`KQkq` or a subset).
    pub fn from_fen_letters(letters: &str) -> Self {
        let mut bits = 0;
        for c in letters.chars() {
            bits |= match c {
                'K' => Self::WHITE_KINGSIDE,
                'Q' => Self::WHITE_QUEENSIDE,
                'k' => Self::BLACK_KINGSIDE,
                'q' => Self::BLACK_QUEENSIDE,
                _ => 0,
            };
        }
        CastlingRights(bits)
    }

    /// Renders the rights as FEN castling letters, `-` when none remain.
    pub fn to_fen_letters(self) -> String {
        let letters: String = [
            (Self::WHITE_KINGSIDE, 'K'),
            (Self::WHITE_QUEENSIDE, 'Q'),
            (Self::BLACK_KINGSIDE, 'k'),
            (Self::BLACK_QUEENSIDE, 'q'),
        ]
        .into_iter()
        .filter(|(flag, _)| self.0 & flag != 0)
        .map(|(_, c)| c)
        .collect();
        if letters.is_empty() {
            "-".to_string()
        } else {
            letters
        }
    }

    /// Returns true if neither the king nor the rook of that side has moved.
    #[inline]
    pub const fn allows(self, color: Color, king_side: bool) -> bool {
        self.0 & Self::flag(color, king_side) != 0
    }

    #[inline]
    pub fn remove(&mut self, color: Color, king_side: bool) {
        self.0 &= !Self::flag(color, king_side);
    }

    #[inline]
    pub fn remove_color(&mut self, color: Color) {
        self.remove(color, true);
        self.remove(color, false);
    }

    /// Updates the rights after `mover` travels from `src` to `dst`.
    pub fn record_move(&mut self, mover: Piece, src: Square, dst: Square) {
        if mover.is_king() {
            self.remove_color(mover.color);
        }
        for sq in [src, dst] {
            for color in Color::ALL {
                let rank = color.back_rank();
                if sq == square(0, rank) {
                    self.remove(color, false);
                } else if sq == square(7, rank) {
                    self.remove(color, true);
                }
            }
        }
    }
}

/// Reason a castling request was turned down.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CastlingRefusal {
    #[error("the king or that rook has already moved")]
    AlreadyMoved,
    #[error("king and rook are not on their home squares")]
    NotInPlace,
    #[error("the king is in check")]
    InCheck,
    #[error("squares between king and rook are occupied")]
    PathBlocked,
    #[error("the king would pass over or land on an attacked square")]
    PathAttacked,
}

/// Ordinal of the stand-in pawn used to probe whether an empty square is attacked.
const PROBE_ORDINAL: u8 = u8::MAX;

/// Checks every precondition for `color` castling on the given side.
pub fn check_castling(
    board: &mut Board,
    rights: CastlingRights,
    color: Color,
    king_side: bool,
) -> Result<(), CastlingRefusal> {
    if !rights.allows(color, king_side) {
        return Err(CastlingRefusal::AlreadyMoved);
    }

    let squares = CastleSquares::new(color, king_side);
    let rook_home = board
        .get(squares.rook_src)
        .is_some_and(|p| p.kind == PieceKind::Rook && p.color == color);
    if board.king_square(color) != Some(squares.king_src) || !rook_home {
        return Err(CastlingRefusal::NotInPlace);
    }

    if in_check(board, color) {
        return Err(CastlingRefusal::InCheck);
    }

    let y = color.back_rank();
    let (between, crossed): (&[u8], &[u8]) = if king_side {
        (&[5, 6], &[5, 6])
    } else {
        (&[1, 2, 3], &[3, 2])
    };
    if between.iter().any(|x| board.get(square(*x, y)).is_some()) {
        return Err(CastlingRefusal::PathBlocked);
    }
    if crossed
        .iter()
        .any(|x| probe_attacked(board, square(*x, y), color))
    {
        return Err(CastlingRefusal::PathAttacked);
    }
    Ok(())
}

/// Stands a `color` pawn on the empty square `sq` and asks whether the
/// opponent could take it.
fn probe_attacked(board: &mut Board, sq: Square, color: Color) -> bool {
    let probe = Piece::new(PieceKind::Pawn, color, PROBE_ORDINAL);
    board.place(probe, sq);
    let attacked = is_attacked(board, sq, color.opposite());
    board.clear(sq);
    attacked
}
