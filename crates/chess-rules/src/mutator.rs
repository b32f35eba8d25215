//! Reversible board mutation.
//!
//! [`Board::make`] and [`Board::make_castle`] apply a move through the board
//! primitives and hand back an [`Undo`] record; [`Board::unmake`] puts every
//! square, the reverse map and the two-square marker back as they were.
//! [`Speculation`] wraps the pair in a guard so a trial move is always
//! reverted, whichever way the caller leaves the scope.

use crate::board::{Board, CastleSquares};
use crate::oracle;
use chess_core::{Color, Piece, Square};
use std::ops::{Deref, DerefMut};

/// Everything needed to take a move back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Undo {
    change: Change,
    pawn_two_square_dst: Option<Square>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Change {
    Step {
        mover: Piece,
        src: Square,
        dst: Square,
        captured: Option<(Piece, Square)>,
    },
    Castle {
        king: Piece,
        rook: Piece,
        squares: CastleSquares,
    },
}

impl Undo {
    /// The piece taken by the move, if any.
    pub fn captured(&self) -> Option<Piece> {
        match &self.change {
            Change::Step { captured, .. } => captured.map(|(piece, _)| piece),
            Change::Castle { .. } => None,
        }
    }
}

impl Board {
    /// Moves the occupant of `src` to `dst`, replacing it with `promotion`
    /// if given, and returns the record that reverses the move.
    pub fn make(&mut self, src: Square, dst: Square, promotion: Option<Piece>) -> Undo {
        let pawn_two_square_dst = self.pawn_two_square_dst();
        let mover = match self.get(src) {
            Some(piece) => piece,
            None => panic!("cannot move from {}: square is empty", src),
        };
        let victim_sq = oracle::en_passant_victim(self, mover, src, dst).unwrap_or(dst);
        let captured = self.get(victim_sq).map(|piece| (piece, victim_sq));

        self.move_piece(src, dst);
        if let Some(piece) = promotion {
            self.promote(piece, dst);
        }

        Undo {
            change: Change::Step {
                mover,
                src,
                dst,
                captured,
            },
            pawn_two_square_dst,
        }
    }

    /// Castles for `color` and returns the record that reverses it.
    pub fn make_castle(&mut self, color: Color, king_side: bool) -> Undo {
        let pawn_two_square_dst = self.pawn_two_square_dst();
        let squares = CastleSquares::new(color, king_side);
        let king = Piece::king(color);
        let rook = match self.get(squares.rook_src) {
            Some(piece) => piece,
            None => panic!("cannot castle: no rook on {}", squares.rook_src),
        };
        self.castle(color, king_side);
        Undo {
            change: Change::Castle {
                king,
                rook,
                squares,
            },
            pawn_two_square_dst,
        }
    }

    /// Reverses a move made by [`Board::make`] or [`Board::make_castle`].
    ///
    /// Undo records must be applied newest first.
    pub fn unmake(&mut self, undo: Undo) {
        match undo.change {
            Change::Step {
                mover,
                src,
                dst,
                captured,
            } => {
                self.clear(dst);
                self.place(mover, src);
                if let Some((piece, sq)) = captured {
                    self.place(piece, sq);
                }
            }
            Change::Castle {
                king,
                rook,
                squares,
            } => {
                self.clear(squares.king_dst);
                self.clear(squares.rook_dst);
                self.place(rook, squares.rook_src);
                self.place(king, squares.king_src);
            }
        }
        self.set_pawn_two_square_dst(undo.pawn_two_square_dst);
    }

    /// Plays `src` to `dst` for the lifetime of the returned guard.
    pub fn speculate(&mut self, src: Square, dst: Square) -> Speculation<'_> {
        let undo = self.make(src, dst, None);
        Speculation {
            board: self,
            undo: Some(undo),
        }
    }

    /// Castles for the lifetime of the returned guard.
    pub fn speculate_castle(&mut self, color: Color, king_side: bool) -> Speculation<'_> {
        let undo = self.make_castle(color, king_side);
        Speculation {
            board: self,
            undo: Some(undo),
        }
    }
}

/// A trial move that is taken back when the guard is dropped.
#[derive(Debug)]
pub struct Speculation<'a> {
    board: &'a mut Board,
    undo: Option<Undo>,
}

impl Speculation<'_> {
    /// The piece the trial move captured.
    pub fn captured(&self) -> Option<Piece> {
        self.undo.as_ref().and_then(Undo::captured)
    }
}

impl Deref for Speculation<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        &*self.board
    }
}

impl DerefMut for Speculation<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        &mut *self.board
    }
}

impl Drop for Speculation<'_> {
    fn drop(&mut self) {
        if let Some(undo) = self.undo.take() {
            self.board.unmake(undo);
        }
    }
}
