//! Writing recorded moves as PGN move text.

use crate::played_move::PlayedMove;
use chess_core::{Color, PieceKind};

/// Renders one move in standard algebraic notation.
pub fn encode_ply(played: &PlayedMove) -> String {
    let mut san = String::new();

    if played.is_castling {
        san.push_str(if played.is_king_side_castle { "O-O" } else { "O-O-O" });
    } else {
        let is_pawn = played.piece.kind == PieceKind::Pawn;
        if !is_pawn {
            san.push(played.piece.kind.san_char());
            if let Some(hint) = played.disambiguation {
                san.push_str(&hint.to_string());
            }
        }
        if played.captured.is_some() {
            if is_pawn {
                san.push(played.src.file_char());
            }
            san.push('x');
        }
        san.push_str(&played.dst.to_string());
        if let Some(promoted) = played.promoted {
            san.push('=');
            san.push(promoted.kind.san_char());
        }
    }

    if played.is_mate {
        san.push('#');
    } else if played.is_check {
        san.push('+');
    }
    san
}

/// The result a terminal move carries, if any.
pub(crate) fn result_token(played: &PlayedMove) -> Option<&'static str> {
    match played.winner {
        Some(winner) => Some(winner.win_marker()),
        None if played.is_draw => Some("1/2-1/2"),
        None => None,
    }
}

/// Renders a move list, one numbered line per full move.
///
/// `first` is the side that made the first move; when it is Black the
/// first line starts `1...`. A terminal move is followed by its result.
pub fn encode_moves(moves: &[PlayedMove], first: Color) -> String {
    let offset = usize::from(first == Color::Black);
    let mut lines = Vec::new();
    let mut line = String::new();

    for (i, played) in moves.iter().enumerate() {
        let ply = i + offset;
        let number = ply / 2 + 1;
        let san = encode_ply(played);
        if ply % 2 == 0 {
            line = format!("{}. {}", number, san);
        } else if line.is_empty() {
            line = format!("{}... {}", number, san);
        } else {
            line.push(' ');
            line.push_str(&san);
        }
        if let Some(result) = result_token(played) {
            line.push(' ');
            line.push_str(result);
        }
        if ply % 2 == 1 {
            lines.push(std::mem::take(&mut line));
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines.join("\n")
}

/// Re-flows whitespace-separated text into lines of at most `width`
/// characters. A single token longer than `width` gets a line of its own.
pub(crate) fn wrap(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut line_len = 0;
    for word in text.split_whitespace() {
        if line_len > 0 && line_len + 1 + word.len() > width {
            out.push('\n');
            line_len = 0;
        } else if line_len > 0 {
            out.push(' ');
            line_len += 1;
        }
        out.push_str(word);
        line_len += word.len();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::played_move::Disambiguation;
    use chess_core::{Piece, Square};

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn pawn(color: Color, ordinal: u8) -> Piece {
        Piece::new(PieceKind::Pawn, color, ordinal)
    }

    #[test]
    fn pawn_and_piece_moves() {
        let push = PlayedMove::new(pawn(Color::White, 4), sq("e2"), sq("e4"));
        assert_eq!(encode_ply(&push), "e4");

        let mut capture = PlayedMove::new(pawn(Color::White, 4), sq("e4"), sq("d5"));
        capture.captured = Some(pawn(Color::Black, 3));
        capture.is_check = true;
        assert_eq!(encode_ply(&capture), "exd5+");

        let mut knight = PlayedMove::new(Piece::new(PieceKind::Knight, Color::White, 0), sq("b1"), sq("d2"));
        knight.disambiguation = Some(Disambiguation::File('b'));
        assert_eq!(encode_ply(&knight), "Nbd2");

        let mut queen = PlayedMove::new(Piece::new(PieceKind::Queen, Color::Black, 0), sq("h4"), sq("e1"));
        queen.disambiguation = Some(Disambiguation::Square(sq("h4")));
        queen.captured = Some(Piece::new(PieceKind::Rook, Color::White, 0));
        queen.is_check = true;
        queen.is_mate = true;
        assert_eq!(encode_ply(&queen), "Qh4xe1#");
    }

    #[test]
    fn castling_and_promotion() {
        let king = Piece::king(Color::Black);
        let long = PlayedMove::castling(king, Square::E8, Square::C8, false);
        assert_eq!(encode_ply(&long), "O-O-O");

        let mut promo = PlayedMove::new(pawn(Color::White, 4), sq("e7"), sq("d8"));
        promo.captured = Some(Piece::new(PieceKind::Rook, Color::Black, 0));
        promo.promoted = Some(Piece::new(PieceKind::Queen, Color::White, 1));
        assert_eq!(encode_ply(&promo), "exd8=Q");
    }

    #[test]
    fn numbering_and_results() {
        let moves = vec![
            PlayedMove::new(pawn(Color::White, 4), sq("e2"), sq("e4")),
            PlayedMove::new(pawn(Color::Black, 4), sq("e7"), sq("e5")),
            PlayedMove::new(pawn(Color::White, 3), sq("d2"), sq("d4")),
        ];
        assert_eq!(encode_moves(&moves, Color::White), "1. e4 e5\n2. d4");

        let mut black_first = moves[1..].to_vec();
        black_first[1].is_draw = true;
        assert_eq!(encode_moves(&black_first, Color::Black), "1... e5\n2. d4 1/2-1/2");

        assert_eq!(encode_moves(&[], Color::White), "");
    }

    #[test]
    fn wraps_on_whitespace() {
        let text = "1. e4 e5\n2. Nf3 Nc6\n3. Bb5 a6";
        assert_eq!(wrap(text, 80), "1. e4 e5 2. Nf3 Nc6 3. Bb5 a6");
        assert_eq!(wrap(text, 12), "1. e4 e5 2.\nNf3 Nc6 3.\nBb5 a6");
        for line in wrap(&"Nf3 ".repeat(100), 80).lines() {
            assert!(line.len() <= 80);
        }
    }
}
