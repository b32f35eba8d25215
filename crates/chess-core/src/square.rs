//! Board square representation.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A square on the chess board, addressed by `x` (file, a=0) and `y` (rank, 1=0).
///
/// Squares are totally ordered by `10 * x + y`, i.e. file-major: a1 < a2 < ... < a8 < b1.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Square {
    x: u8,
    y: u8,
}

impl Square {
    /// Creates a square from coordinates, failing if either is outside `0..=7`.
    pub fn new(x: i32, y: i32) -> Result<Self, ParseError> {
        if (0..8).contains(&x) && (0..8).contains(&y) {
            Ok(Square {
                x: x as u8,
                y: y as u8,
            })
        } else {
            Err(ParseError::InvalidCoordinates(x, y))
        }
    }

    /// Creates a square from coordinates known to be on the board.
    const fn at(x: u8, y: u8) -> Self {
        Square { x, y }
    }

    /// Returns the square at `index` in `0..64`, a1 = 0, b1 = 1, ..., h8 = 63.
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 64 {
            Some(Square::at(index % 8, index / 8))
        } else {
            None
        }
    }

    /// Iterates over all 64 squares, a1 to h8 rank by rank.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64u8).map(|i| Square::at(i % 8, i / 8))
    }

    /// Returns the file coordinate (0 = a).
    #[inline]
    pub const fn x(self) -> u8 {
        self.x
    }

    /// Returns the rank coordinate (0 = rank 1).
    #[inline]
    pub const fn y(self) -> u8 {
        self.y
    }

    /// Returns the dense index, rank-major (a1 = 0, h8 = 63).
    #[inline]
    pub const fn index(self) -> usize {
        self.y as usize * 8 + self.x as usize
    }

    /// Returns the square displaced by `(dx, dy)`, if it stays on the board.
    #[inline]
    pub fn offset(self, dx: i8, dy: i8) -> Option<Square> {
        let x = self.x as i8 + dx;
        let y = self.y as i8 + dy;
        if (0..8).contains(&x) && (0..8).contains(&y) {
            Some(Square::at(x as u8, y as u8))
        } else {
            None
        }
    }

    /// Returns `(dx, dy)` from `self` to `other`.
    #[inline]
    pub fn delta(self, other: Square) -> (i8, i8) {
        (
            other.x as i8 - self.x as i8,
            other.y as i8 - self.y as i8,
        )
    }

    /// Returns the file letter.
    #[inline]
    pub const fn file_char(self) -> char {
        (b'a' + self.x) as char
    }

    /// Returns the rank digit.
    #[inline]
    pub const fn rank_char(self) -> char {
        (b'1' + self.y) as char
    }

    /// Parses a file letter `a`..`h` into its x coordinate.
    pub const fn file_from_char(c: char) -> Option<u8> {
        match c {
            'a'..='h' => Some(c as u8 - b'a'),
            _ => None,
        }
    }

    /// Parses a rank digit `1`..`8` into its y coordinate.
    pub const fn rank_from_char(c: char) -> Option<u8> {
        match c {
            '1'..='8' => Some(c as u8 - b'1'),
            _ => None,
        }
    }

    /// Returns true for dark squares (a1 is dark).
    #[inline]
    pub const fn is_dark(self) -> bool {
        (self.x + self.y) % 2 == 0
    }

    /// Returns the algebraic notation for this square.
    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.file_char(), self.rank_char())
    }

    const fn order_key(self) -> u8 {
        10 * self.x + self.y
    }

    pub const A1: Square = Square::at(0, 0);
    pub const B1: Square = Square::at(1, 0);
    pub const C1: Square = Square::at(2, 0);
    pub const D1: Square = Square::at(3, 0);
    pub const E1: Square = Square::at(4, 0);
    pub const F1: Square = Square::at(5, 0);
    pub const G1: Square = Square::at(6, 0);
    pub const H1: Square = Square::at(7, 0);
    pub const A8: Square = Square::at(0, 7);
    pub const B8: Square = Square::at(1, 7);
    pub const C8: Square = Square::at(2, 7);
    pub const D8: Square = Square::at(3, 7);
    pub const E8: Square = Square::at(4, 7);
    pub const F8: Square = Square::at(5, 7);
    pub const G8: Square = Square::at(6, 7);
    pub const H8: Square = Square::at(7, 7);
}

impl Ord for Square {
    fn cmp(&self, other: &Self) -> Ordering {
        self.order_key().cmp(&other.order_key())
    }
}

impl PartialOrd for Square {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Square {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(f), Some(r), None) => match (Square::file_from_char(f), Square::rank_from_char(r)) {
                (Some(x), Some(y)) => Ok(Square::at(x, y)),
                _ => Err(ParseError::InvalidSquare(s.to_string())),
            },
            _ => Err(ParseError::InvalidSquare(s.to_string())),
        }
    }
}

impl TryFrom<(i32, i32)> for Square {
    type Error = ParseError;

    fn try_from((x, y): (i32, i32)) -> Result<Self, Self::Error> {
        Square::new(x, y)
    }
}

impl TryFrom<String> for Square {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Square> for String {
    fn from(sq: Square) -> String {
        sq.to_algebraic()
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self.to_algebraic())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn square_new() {
        let e4 = Square::new(4, 3).unwrap();
        assert_eq!(e4.x(), 4);
        assert_eq!(e4.y(), 3);
        assert_eq!(e4.index(), 28);
        assert_eq!(e4.to_algebraic(), "e4");
    }

    #[test]
    fn square_new_rejects_out_of_range() {
        assert_eq!(Square::new(8, 0), Err(ParseError::InvalidCoordinates(8, 0)));
        assert_eq!(Square::new(0, -1), Err(ParseError::InvalidCoordinates(0, -1)));
        assert!(Square::try_from((3, 9)).is_err());
    }

    #[test]
    fn square_from_str() {
        assert_eq!("a1".parse::<Square>(), Ok(Square::A1));
        assert_eq!("h8".parse::<Square>(), Ok(Square::H8));
        assert_eq!("e4".parse::<Square>(), Square::new(4, 3));
        assert!("i1".parse::<Square>().is_err());
        assert!("a9".parse::<Square>().is_err());
        assert!("".parse::<Square>().is_err());
        assert!("e44".parse::<Square>().is_err());
    }

    #[test]
    fn ordering_is_file_major() {
        let a8: Square = "a8".parse().unwrap();
        let b1: Square = "b1".parse().unwrap();
        assert!(Square::A1 < a8);
        assert!(a8 < b1);
        assert!(Square::H1 < Square::H8);
    }

    #[test]
    fn offset_stays_on_board() {
        assert_eq!(Square::E1.offset(1, 0), Some(Square::F1));
        assert_eq!(Square::H1.offset(1, 0), None);
        assert_eq!(Square::A1.offset(0, -1), None);
        assert_eq!(Square::A1.delta(Square::H8), (7, 7));
    }

    #[test]
    fn colors_of_squares() {
        assert!(Square::A1.is_dark());
        assert!(!Square::B1.is_dark());
        assert!(!Square::A8.is_dark());
    }

    proptest! {
        #[test]
        fn algebraic_roundtrip(x in 0i32..8, y in 0i32..8) {
            let sq = Square::new(x, y).unwrap();
            prop_assert_eq!(sq.to_algebraic().parse::<Square>(), Ok(sq));
            prop_assert_eq!(Square::from_index(sq.index() as u8), Some(sq));
        }
    }
}
