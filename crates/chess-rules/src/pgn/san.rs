//! Ply tokens in Standard Algebraic Notation.
//!
//! Examples: "e4", "Nf3", "Bxc6", "O-O", "e8=Q", "Nbd2", "R1e1", "Qh4e1#".

use chess_core::{PieceKind, Square};

/// A ply token split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SanMove {
    Castle {
        king_side: bool,
        check: bool,
        mate: bool,
    },
    Normal {
        kind: PieceKind,
        from_file: Option<u8>,
        from_rank: Option<u8>,
        capture: bool,
        dst: Square,
        promotion: Option<PieceKind>,
        check: bool,
        mate: bool,
    },
}

impl SanMove {
    pub fn check(&self) -> bool {
        match self {
            SanMove::Castle { check, .. } | SanMove::Normal { check, .. } => *check,
        }
    }

    pub fn mate(&self) -> bool {
        match self {
            SanMove::Castle { mate, .. } | SanMove::Normal { mate, .. } => *mate,
        }
    }

    /// Parses a token with annotation glyphs already removed.
    pub fn parse(token: &str) -> Option<SanMove> {
        let mate = token.ends_with('#');
        let check = mate || token.ends_with('+');
        let body = token.trim_end_matches(&['+', '#'][..]);

        match body {
            "O-O" | "0-0" => {
                return Some(SanMove::Castle {
                    king_side: true,
                    check,
                    mate,
                })
            }
            "O-O-O" | "0-0-0" => {
                return Some(SanMove::Castle {
                    king_side: false,
                    check,
                    mate,
                })
            }
            _ => {}
        }

        let chars: Vec<char> = body.chars().collect();
        let mut idx = 0;

        let kind = match chars.first().copied().and_then(PieceKind::from_san_char) {
            Some(kind) if kind != PieceKind::Pawn => {
                idx += 1;
                kind
            }
            _ => PieceKind::Pawn,
        };

        // Promotion: "=Q", or a bare trailing piece letter.
        let mut end = chars.len();
        let mut promotion = None;
        if let Some(last) = chars.last().copied() {
            if let Some(promo) = PieceKind::from_san_char(last).filter(|k| k.is_promotion_target()) {
                if kind == PieceKind::Pawn && end > idx + 2 {
                    promotion = Some(promo);
                    end -= 1;
                    if chars[end - 1] == '=' {
                        end -= 1;
                    }
                }
            }
        }

        let rest = &chars[idx..end];
        if rest.len() < 2 {
            return None;
        }
        let (head, dst) = rest.split_at(rest.len() - 2);
        let dst = Square::new(
            Square::file_from_char(dst[0])? as i32,
            Square::rank_from_char(dst[1])? as i32,
        )
        .ok()?;

        let (head, capture) = match head.split_last() {
            Some(('x', before)) => (before, true),
            _ => (head, false),
        };

        let (from_file, from_rank) = match head {
            [] => (None, None),
            [c] => match (Square::file_from_char(*c), Square::rank_from_char(*c)) {
                (Some(file), _) => (Some(file), None),
                (None, Some(rank)) => (None, Some(rank)),
                (None, None) => return None,
            },
            [f, r] => (
                Some(Square::file_from_char(*f)?),
                Some(Square::rank_from_char(*r)?),
            ),
            _ => return None,
        };

        if kind == PieceKind::Pawn && (from_rank.is_some() || (capture && from_file.is_none())) {
            return None;
        }

        Some(SanMove::Normal {
            kind,
            from_file,
            from_rank,
            capture,
            dst,
            promotion,
            check,
            mate,
        })
    }
}

/// Removes trailing `!` and `?` annotation glyphs.
pub(crate) fn strip_glyphs(token: &str) -> &str {
    token.trim_end_matches(&['!', '?'][..])
}
