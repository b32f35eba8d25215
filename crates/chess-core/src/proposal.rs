//! Move proposals submitted to a game.

use crate::{ParseError, PieceKind, Square};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A request to move whatever stands on `src` to `dst`.
///
/// The textual form is four characters, `e2e4`; a fifth character selects
/// the promotion kind, `e7e8q`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Proposal {
    pub src: Square,
    pub dst: Square,
    pub promotion: Option<PieceKind>,
}

impl Proposal {
    #[inline]
    pub const fn new(src: Square, dst: Square) -> Self {
        Proposal {
            src,
            dst,
            promotion: None,
        }
    }

    /// Returns this proposal carrying a promotion selection.
    #[inline]
    pub const fn with_promotion(self, kind: PieceKind) -> Self {
        Proposal {
            promotion: Some(kind),
            ..self
        }
    }
}

fn promotion_from_char(c: char) -> Result<PieceKind, ParseError> {
    match c.to_ascii_lowercase() {
        'q' => Ok(PieceKind::Queen),
        'r' => Ok(PieceKind::Rook),
        'b' => Ok(PieceKind::Bishop),
        'n' => Ok(PieceKind::Knight),
        _ => Err(ParseError::InvalidPromotion(c)),
    }
}

impl FromStr for Proposal {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidProposal(s.to_string());
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(invalid());
        }
        let src: Square = s[0..2].parse().map_err(|_| invalid())?;
        let dst: Square = s[2..4].parse().map_err(|_| invalid())?;
        let proposal = Proposal::new(src, dst);
        match s[4..].chars().next() {
            Some(c) => Ok(proposal.with_promotion(promotion_from_char(c)?)),
            None => Ok(proposal),
        }
    }
}

impl From<(Square, Square)> for Proposal {
    fn from((src, dst): (Square, Square)) -> Self {
        Proposal::new(src, dst)
    }
}

impl fmt::Display for Proposal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.src, self.dst)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.san_char().to_ascii_lowercase())?;
        }
        Ok(())
    }
}
