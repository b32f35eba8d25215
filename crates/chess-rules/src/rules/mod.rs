//! Rules that look past a single piece: attacks, check, king safety,
//! legal move enumeration, and checkmate.
//!
//! Everything here works on a bare [`Board`] plus [`CastlingRights`]. Trial
//! moves go through [`Board::speculate`], so a `&mut Board` handed in comes
//! back unchanged.

mod castling;

pub use castling::{check_castling, CastlingRefusal, CastlingRights};

use crate::board::Board;
use crate::oracle::{self, MoveOracle};
use chess_core::{Color, Piece, Square};

/// Pieces of color `by` that could capture whatever stands on `sq`.
pub fn attackers(board: &Board, sq: Square, by: Color) -> Vec<(Square, Piece)> {
    board
        .pieces()
        .filter(|(from, piece)| {
            piece.color == by && MoveOracle::new().is_legal_for(board, *piece, *from, sq)
        })
        .collect()
}

/// Returns true if some piece of color `by` could capture the occupant of `sq`.
pub fn is_attacked(board: &Board, sq: Square, by: Color) -> bool {
    board.pieces().any(|(from, piece)| {
        piece.color == by && MoveOracle::new().is_legal_for(board, piece, from, sq)
    })
}

/// Returns true if the king of `color` is attacked.
pub fn in_check(board: &Board, color: Color) -> bool {
    match board.king_square(color) {
        Some(king) => is_attacked(board, king, color.opposite()),
        None => false,
    }
}

/// Returns true if moving the occupant of `src` to `dst` leaves its own king
/// out of reach of every enemy piece.
pub fn keeps_king_safe(board: &mut Board, src: Square, dst: Square) -> bool {
    let Some(mover) = board.get(src) else {
        return false;
    };
    let trial = board.speculate(src, dst);
    !in_check(&trial, mover.color)
}

/// Full legality of moving the occupant of `src` to `dst`, turn order aside.
///
/// A king stepping two files from its home square is judged as castling and
/// nothing else.
pub fn is_move_legal(board: &mut Board, rights: CastlingRights, src: Square, dst: Square) -> bool {
    let Some(piece) = board.get(src) else {
        return false;
    };
    if oracle::is_castling_shape(piece, src, dst) {
        let king_side = dst.x() > src.x();
        return check_castling(board, rights, piece.color, king_side).is_ok();
    }
    MoveOracle::new().is_legal_for(board, piece, src, dst) && keeps_king_safe(board, src, dst)
}

/// Destinations worth testing for the occupant of `sq`.
fn candidates(board: &Board, sq: Square, piece: Piece) -> Vec<Square> {
    let mut dsts: Vec<Square> = board.move_hints(sq).into_iter().map(|(dst, _)| dst).collect();
    if piece.is_king() {
        dsts.extend([sq.offset(2, 0), sq.offset(-2, 0)].into_iter().flatten());
    }
    dsts
}

/// Every legal `(src, dst)` pair for `color`, sources in board order.
pub fn legal_moves(board: &mut Board, rights: CastlingRights, color: Color) -> Vec<(Square, Square)> {
    let mut moves = Vec::new();
    for (src, piece) in board.pieces_of(color) {
        for dst in candidates(board, src, piece) {
            if is_move_legal(board, rights, src, dst) {
                moves.push((src, dst));
            }
        }
    }
    moves
}

/// Returns true if `color` has at least one legal move.
pub fn has_legal_move(board: &mut Board, rights: CastlingRights, color: Color) -> bool {
    for (src, piece) in board.pieces_of(color) {
        for dst in candidates(board, src, piece) {
            if is_move_legal(board, rights, src, dst) {
                return true;
            }
        }
    }
    false
}

/// Returns true if `defender` is in check and can neither take a checker,
/// block the check, nor step the king out of it.
pub fn is_checkmate(board: &mut Board, defender: Color) -> bool {
    let Some(king_sq) = board.king_square(defender) else {
        return false;
    };
    let checkers = attackers(board, king_sq, defender.opposite());
    if checkers.is_empty() {
        return false;
    }

    let answers = |board: &mut Board, dst: Square, include_king: bool| -> bool {
        board.pieces_of(defender).into_iter().any(|(src, piece)| {
            (include_king || !piece.is_king())
                && MoveOracle::new().is_legal_for(board, piece, src, dst)
                && keeps_king_safe(board, src, dst)
        })
    };

    for (checker_sq, checker) in &checkers {
        if answers(board, *checker_sq, true) {
            return false;
        }
        // A checking pawn that just advanced two squares can also be taken in passing.
        if checker.is_pawn() && board.pawn_two_square_dst() == Some(*checker_sq) {
            if let Some(behind) = checker_sq.offset(0, defender.forward()) {
                if board.get(behind).is_none() && answers(board, behind, false) {
                    return false;
                }
            }
        }
        if checker.kind.is_slider() {
            let between: Vec<Square> = oracle::interior(*checker_sq, king_sq).collect();
            for sq in between {
                if answers(board, sq, false) {
                    return false;
                }
            }
        }
    }

    let king = Piece::king(defender);
    let escapes: Vec<Square> = king
        .rays()
        .iter()
        .filter_map(|ray| king_sq.offset(ray.dx, ray.dy))
        .collect();
    !escapes.into_iter().any(|dst| {
        MoveOracle::new().is_legal_for(board, king, king_sq, dst) && keeps_king_safe(board, king_sq, dst)
    })
}

/// Returns true if `color` is not in check and has no legal move.
pub fn is_stalemate(board: &mut Board, rights: CastlingRights, color: Color) -> bool {
    !in_check(board, color) && !has_legal_move(board, rights, color)
}
