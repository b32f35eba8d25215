//! Who threatens whom.

use crate::board::Board;
use crate::oracle::MoveOracle;
use chess_core::{Color, Piece};
use std::collections::BTreeMap;

/// For each color, every piece of that color mapped to the enemy pieces it
/// could capture on the current board.
///
/// Rebuilt from scratch after every accepted move. Pieces that threaten
/// nothing have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capturables {
    white: BTreeMap<Piece, Vec<Piece>>,
    black: BTreeMap<Piece, Vec<Piece>>,
}

impl Capturables {
    pub fn compute(board: &Board) -> Self {
        let mut capturables = Capturables::default();
        for (src, piece) in board.pieces() {
            let victims: Vec<Piece> = board
                .move_hints(src)
                .into_iter()
                .filter_map(|(dst, victim)| {
                    let victim = victim?;
                    MoveOracle::new()
                        .is_legal_for(board, piece, src, dst)
                        .then_some(victim)
                })
                .collect();
            if !victims.is_empty() {
                capturables.map_mut(piece.color).insert(piece, victims);
            }
        }
        capturables
    }

    fn map_mut(&mut self, color: Color) -> &mut BTreeMap<Piece, Vec<Piece>> {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    /// Threats held by pieces of `color`.
    pub fn of(&self, color: Color) -> &BTreeMap<Piece, Vec<Piece>> {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    /// Returns true if `attacker` could capture `victim`.
    pub fn threatens(&self, attacker: Piece, victim: Piece) -> bool {
        self.of(attacker.color)
            .get(&attacker)
            .is_some_and(|victims| victims.contains(&victim))
    }

    /// Enemy pieces that could capture `victim`.
    pub fn attackers_of(&self, victim: Piece) -> Vec<Piece> {
        self.of(victim.color.opposite())
            .iter()
            .filter(|(_, victims)| victims.contains(&victim))
            .map(|(attacker, _)| *attacker)
            .collect()
    }

    pub fn is_threatened(&self, victim: Piece) -> bool {
        self.of(victim.color.opposite())
            .values()
            .any(|victims| victims.contains(&victim))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::PieceKind;

    #[test]
    fn start_position_has_no_threats() {
        let capturables = Capturables::compute(&Board::new());
        assert!(capturables.of(Color::White).is_empty());
        assert!(capturables.of(Color::Black).is_empty());
    }

    #[test]
    fn mutual_pawn_threats() {
        let board = Board::from_fen("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1").unwrap();
        let capturables = Capturables::compute(&board);
        let white_pawn = Piece::new(PieceKind::Pawn, Color::White, 0);
        let black_pawn = Piece::new(PieceKind::Pawn, Color::Black, 0);
        assert!(capturables.threatens(white_pawn, black_pawn));
        assert!(capturables.threatens(black_pawn, white_pawn));
        assert_eq!(capturables.attackers_of(black_pawn), vec![white_pawn]);
    }

    #[test]
    fn king_is_never_listed_as_takeable_by_king() {
        let board = Board::from_fen("8/8/8/8/8/8/8/Kk6 w - - 0 1").unwrap();
        let capturables = Capturables::compute(&board);
        assert!(!capturables.is_threatened(Piece::king(Color::Black)));
    }

    #[test]
    fn check_shows_up_as_threat_on_king() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K2r w - - 0 1").unwrap();
        let capturables = Capturables::compute(&board);
        let rook = Piece::new(PieceKind::Rook, Color::Black, 0);
        assert!(capturables.threatens(rook, Piece::king(Color::White)));
        assert_eq!(capturables.attackers_of(Piece::king(Color::White)), vec![rook]);
    }
}
