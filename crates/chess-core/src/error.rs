//! Errors for malformed textual or numeric input.

use thiserror::Error;

/// Errors raised when building core values from untrusted input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid square '{0}': expected a file a-h followed by a rank 1-8")]
    InvalidSquare(String),

    #[error("invalid coordinates ({0}, {1}): both must be in 0..=7")]
    InvalidCoordinates(i32, i32),

    #[error("invalid move '{0}': expected source and destination squares, e.g. 'e2e4'")]
    InvalidProposal(String),

    #[error("invalid promotion piece '{0}': expected one of q, r, b, n")]
    InvalidPromotion(char),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_input() {
        assert!(ParseError::InvalidSquare("z9".into()).to_string().contains("z9"));
        assert!(ParseError::InvalidCoordinates(8, -1).to_string().contains("(8, -1)"));
        assert!(ParseError::InvalidProposal("e2".into()).to_string().contains("'e2'"));
        assert!(ParseError::InvalidPromotion('k').to_string().contains("'k'"));
    }
}
