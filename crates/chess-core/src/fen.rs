//! FEN (Forsyth-Edwards Notation) position input.
//!
//! Only the fields that describe the board are interpreted: piece placement,
//! active color, castling availability and the en passant target. Trailing
//! move clocks are accepted and ignored.

use crate::{Color, PieceKind, Square};
use thiserror::Error;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 1 to 6 fields, got {0}")]
    InvalidFieldCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling availability: {0}")]
    InvalidCastling(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),
}

/// The board-relevant content of a FEN record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen {
    /// Occupied squares with the kind and color standing on them, a8 first.
    pub placement: Vec<(Square, PieceKind, Color)>,
    pub side_to_move: Color,
    /// Castling availability letters, `KQkq` or a subset; empty for `-`.
    pub castling: String,
    /// The square a pawn skipped over on the previous move.
    pub en_passant: Option<Square>,
}

impl Fen {
    /// The standard starting position.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses a FEN string. Missing trailing fields default to White to move,
    /// no castling rights, no en passant target.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.is_empty() || fields.len() > 6 {
            return Err(FenError::InvalidFieldCount(fields.len()));
        }

        let placement = parse_placement(fields[0])?;

        let side_to_move = match fields.get(1).copied() {
            None => Color::White,
            Some(field) => {
                let mut chars = field.chars();
                match (chars.next().and_then(Color::from_fen_char), chars.next()) {
                    (Some(color), None) => color,
                    _ => return Err(FenError::InvalidActiveColor(field.to_string())),
                }
            }
        };

        let castling = match fields.get(2).copied() {
            None | Some("-") => String::new(),
            Some(letters) => {
                if let Some(bad) = letters.chars().find(|c| !"KQkq".contains(*c)) {
                    return Err(FenError::InvalidCastling(format!(
                        "invalid character '{}'",
                        bad
                    )));
                }
                letters.to_string()
            }
        };

        let en_passant = match fields.get(3).copied() {
            None | Some("-") => None,
            Some(target) => {
                let sq: Square = target
                    .parse()
                    .map_err(|_| FenError::InvalidEnPassantSquare(target.to_string()))?;
                if sq.y() != 2 && sq.y() != 5 {
                    return Err(FenError::InvalidEnPassantSquare(target.to_string()));
                }
                Some(sq)
            }
        };

        Ok(Fen {
            placement,
            side_to_move,
            castling,
            en_passant,
        })
    }
}

fn parse_placement(placement: &str) -> Result<Vec<(Square, PieceKind, Color)>, FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::InvalidPiecePlacement(format!(
            "expected 8 ranks, got {}",
            ranks.len()
        )));
    }

    let mut pieces = Vec::new();
    for (i, rank) in ranks.iter().enumerate() {
        let y = 7 - i as i32;
        let mut x = 0i32;
        for c in rank.chars() {
            if let Some(skip) = c.to_digit(10) {
                x += skip as i32;
            } else if let Some((kind, color)) = PieceKind::from_fen_char(c) {
                let sq = Square::new(x, y).map_err(|_| {
                    FenError::InvalidPiecePlacement(format!("rank {} overflows", y + 1))
                })?;
                pieces.push((sq, kind, color));
                x += 1;
            } else {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "invalid character '{}' in rank {}",
                    c,
                    y + 1
                )));
            }
        }
        if x != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "rank {} has {} squares, expected 8",
                y + 1,
                x
            )));
        }
    }
    Ok(pieces)
}

/// Renders a placement field from a lookup of the FEN letter on each square.
pub fn format_placement(mut letter_at: impl FnMut(Square) -> Option<char>) -> String {
    let mut out = String::new();
    for y in (0..8).rev() {
        let mut empty = 0;
        for x in 0..8 {
            let sq = Square::new(x, y).expect("loop stays on the board");
            match letter_at(sq) {
                Some(c) => {
                    if empty > 0 {
                        out.push_str(&empty.to_string());
                        empty = 0;
                    }
                    out.push(c);
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            out.push_str(&empty.to_string());
        }
        if y > 0 {
            out.push('/');
        }
    }
    out
}
