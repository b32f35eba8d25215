//! Compile-time movement tables.
//!
//! Every piece kind moves along a fixed set of rays. A ray is a unit step
//! `(dx, dy)` repeated up to `reach` times: sliding pieces reach 7 squares,
//! knights, kings and pawns a single one.

use crate::Square;

/// A direction of travel and how far a piece may follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ray {
    pub dx: i8,
    pub dy: i8,
    pub reach: u8,
}

impl Ray {
    pub const fn new(dx: i8, dy: i8, reach: u8) -> Self {
        Ray { dx, dy, reach }
    }

    /// Offsets along the ray, nearest first.
    pub fn offsets(self) -> impl Iterator<Item = (i8, i8)> {
        (1..=self.reach as i8).map(move |k| (self.dx * k, self.dy * k))
    }

    /// Squares along the ray starting next to `from`, stopping at the board edge.
    pub fn walk(self, from: Square) -> impl Iterator<Item = Square> {
        self.offsets()
            .map_while(move |(dx, dy)| from.offset(dx, dy))
    }

    /// Returns true if `(dx, dy)` is one of this ray's offsets.
    pub fn contains(self, dx: i8, dy: i8) -> bool {
        self.offsets().any(|offset| offset == (dx, dy))
    }
}

const SLIDE: u8 = 7;

pub const ROOK_RAYS: [Ray; 4] = [
    Ray::new(1, 0, SLIDE),
    Ray::new(-1, 0, SLIDE),
    Ray::new(0, 1, SLIDE),
    Ray::new(0, -1, SLIDE),
];

pub const BISHOP_RAYS: [Ray; 4] = [
    Ray::new(1, 1, SLIDE),
    Ray::new(1, -1, SLIDE),
    Ray::new(-1, 1, SLIDE),
    Ray::new(-1, -1, SLIDE),
];

pub const QUEEN_RAYS: [Ray; 8] = [
    Ray::new(1, 0, SLIDE),
    Ray::new(-1, 0, SLIDE),
    Ray::new(0, 1, SLIDE),
    Ray::new(0, -1, SLIDE),
    Ray::new(1, 1, SLIDE),
    Ray::new(1, -1, SLIDE),
    Ray::new(-1, 1, SLIDE),
    Ray::new(-1, -1, SLIDE),
];

pub const KNIGHT_RAYS: [Ray; 8] = [
    Ray::new(-2, -1, 1),
    Ray::new(-2, 1, 1),
    Ray::new(-1, -2, 1),
    Ray::new(-1, 2, 1),
    Ray::new(1, -2, 1),
    Ray::new(1, 2, 1),
    Ray::new(2, -1, 1),
    Ray::new(2, 1, 1),
];

pub const KING_RAYS: [Ray; 8] = [
    Ray::new(1, 0, 1),
    Ray::new(-1, 0, 1),
    Ray::new(0, 1, 1),
    Ray::new(0, -1, 1),
    Ray::new(1, 1, 1),
    Ray::new(1, -1, 1),
    Ray::new(-1, 1, 1),
    Ray::new(-1, -1, 1),
];

/// Forward push, then the two capture diagonals.
pub const WHITE_PAWN_RAYS: [Ray; 3] = [
    Ray::new(0, 1, 1),
    Ray::new(-1, 1, 1),
    Ray::new(1, 1, 1),
];

/// White's pawn rays reflected across the middle of the board.
pub const BLACK_PAWN_RAYS: [Ray; 3] = [
    Ray::new(0, -1, 1),
    Ray::new(-1, -1, 1),
    Ray::new(1, -1, 1),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slider_offsets_reach_seven() {
        let offsets: Vec<_> = ROOK_RAYS[0].offsets().collect();
        assert_eq!(offsets.len(), 7);
        assert_eq!(offsets[0], (1, 0));
        assert_eq!(offsets[6], (7, 0));
    }

    #[test]
    fn walk_stops_at_edge() {
        let squares: Vec<_> = BISHOP_RAYS[0].walk(Square::F1).collect();
        assert_eq!(squares.len(), 2);
        assert_eq!(squares[1], Square::H1.offset(0, 2).unwrap());
    }

    #[test]
    fn contains_matches_multiples_only() {
        assert!(QUEEN_RAYS[4].contains(3, 3));
        assert!(!QUEEN_RAYS[4].contains(3, 2));
        assert!(KNIGHT_RAYS[7].contains(2, 1));
        assert!(!KNIGHT_RAYS[7].contains(4, 2));
    }

    #[test]
    fn black_pawns_mirror_white() {
        for (w, b) in WHITE_PAWN_RAYS.iter().zip(BLACK_PAWN_RAYS.iter()) {
            assert_eq!(w.dx, b.dx);
            assert_eq!(w.dy, -b.dy);
        }
    }
}
