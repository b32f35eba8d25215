//! Move legality oracle.
//!
//! [`MoveOracle`] answers one question: may a piece travel from one square to
//! another on a given board? It checks piece geometry, blocking, and capture
//! rules. It does not look at whose turn it is or whether the mover's own
//! king ends up attacked; the game layers those rules on top.

use crate::board::Board;
use chess_core::{Piece, PieceKind, Square};

/// Geometric and blocking legality test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOracle {
    check_dst: bool,
}

impl Default for MoveOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveOracle {
    /// An oracle that refuses moves onto friendly pieces.
    pub const fn new() -> Self {
        MoveOracle { check_dst: true }
    }

    /// An oracle that ignores a friendly occupant on the destination.
    ///
    /// Used to ask whether a sibling piece could also reach a square that
    /// the mover is about to occupy.
    pub const fn without_dst_check() -> Self {
        MoveOracle { check_dst: false }
    }

    /// Tests the occupant of `src` moving to `dst`.
    pub fn is_legal(self, board: &Board, src: Square, dst: Square) -> bool {
        match board.get(src) {
            Some(piece) => self.is_legal_for(board, piece, src, dst),
            None => false,
        }
    }

    /// Tests `piece` moving from `src` to `dst`.
    pub fn is_legal_for(self, board: &Board, piece: Piece, src: Square, dst: Square) -> bool {
        if src == dst || board.get(src).is_none() {
            return false;
        }
        if !fits_geometry(piece, src, dst) {
            return false;
        }

        let target = board.get(dst);
        if self.check_dst && target.is_some_and(|t| t.color == piece.color) {
            return false;
        }

        if piece.is_king() {
            if target.is_some_and(|t| t.is_king()) {
                return false;
            }
            if let Some(enemy_king) = board.king_square(piece.color.opposite()) {
                if distance(dst, enemy_king) <= 1 {
                    return false;
                }
            }
        }

        match piece.kind {
            PieceKind::Pawn => pawn_may_move(board, piece, src, dst),
            kind if kind.is_slider() => interior(src, dst).all(|sq| board.get(sq).is_none()),
            _ => true,
        }
    }
}

/// Shorthand for [`MoveOracle::new`]`.is_legal(board, src, dst)`.
#[inline]
pub fn is_legal(board: &Board, src: Square, dst: Square) -> bool {
    MoveOracle::new().is_legal(board, src, dst)
}

fn fits_geometry(piece: Piece, src: Square, dst: Square) -> bool {
    let (dx, dy) = src.delta(dst);
    match piece.kind {
        PieceKind::Pawn => {
            let forward = piece.color.forward();
            let double = dx == 0 && dy == 2 * forward && src.y() == piece.color.pawn_rank();
            double || piece.rays().iter().any(|ray| ray.contains(dx, dy))
        }
        PieceKind::King => {
            piece.rays().iter().any(|ray| ray.contains(dx, dy)) || is_castling_shape(piece, src, dst)
        }
        _ => piece.rays().iter().any(|ray| ray.contains(dx, dy)),
    }
}

/// A king on its home square stepping two files sideways along its back rank.
pub(crate) fn is_castling_shape(piece: Piece, src: Square, dst: Square) -> bool {
    let (dx, dy) = src.delta(dst);
    let rank = piece.color.back_rank();
    piece.is_king() && dy == 0 && dx.abs() == 2 && src.x() == 4 && src.y() == rank
}

fn pawn_may_move(board: &Board, pawn: Piece, src: Square, dst: Square) -> bool {
    let (dx, dy) = src.delta(dst);
    if dx == 0 {
        if board.get(dst).is_some() {
            return false;
        }
        if dy.abs() == 2 {
            let skipped = src.offset(0, dy / 2);
            return skipped.is_some_and(|sq| board.get(sq).is_none());
        }
        true
    } else {
        board.get(dst).is_some() || en_passant_victim(board, pawn, src, dst).is_some()
    }
}

/// Square of the pawn an en passant move from `src` to `dst` would take.
///
/// The move must be a diagonal pawn step onto an empty square, and the pawn
/// that last advanced two squares must stand on the destination file, one
/// rank behind the destination from the mover's side.
pub fn en_passant_victim(board: &Board, mover: Piece, src: Square, dst: Square) -> Option<Square> {
    if !mover.is_pawn() || board.get(dst).is_some() {
        return None;
    }
    let (dx, dy) = src.delta(dst);
    let forward = mover.color.forward();
    if dx.abs() != 1 || dy != forward {
        return None;
    }
    let passed = board.pawn_two_square_dst()?;
    let behind = dst.offset(0, -forward)?;
    let victim = board.get(passed)?;
    (passed == behind && victim.is_pawn() && victim.color != mover.color).then_some(passed)
}

/// Returns true if the move is an en passant capture.
#[inline]
pub fn is_en_passant(board: &Board, mover: Piece, src: Square, dst: Square) -> bool {
    en_passant_victim(board, mover, src, dst).is_some()
}

/// Squares from `src` to `dst` inclusive along a rank, file, or diagonal.
///
/// Empty when the two squares are not aligned or are equal.
pub fn path(src: Square, dst: Square) -> Vec<Square> {
    let (dx, dy) = src.delta(dst);
    let aligned = dx == 0 || dy == 0 || dx.abs() == dy.abs();
    if src == dst || !aligned {
        return Vec::new();
    }
    let steps = dx.abs().max(dy.abs());
    let (sx, sy) = (dx.signum(), dy.signum());
    (0..=steps)
        .filter_map(|k| src.offset(sx * k, sy * k))
        .collect()
}

/// Squares strictly between `src` and `dst`.
pub(crate) fn interior(src: Square, dst: Square) -> impl Iterator<Item = Square> {
    let squares = path(src, dst);
    let inner = squares.len().saturating_sub(2);
    squares.into_iter().skip(1).take(inner)
}

/// Chebyshev distance between two squares.
#[inline]
pub(crate) fn distance(a: Square, b: Square) -> i8 {
    let (dx, dy) = a.delta(b);
    dx.abs().max(dy.abs())
}
