//! Replaying a recorded game.

use crate::board::Board;
use crate::played_move::PlayedMove;

/// The board after some prefix of the history, and the move that ended it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayResult {
    pub board: Board,
    /// `None` when the cursor stands before the first move.
    pub played: Option<PlayedMove>,
}

/// A cursor over a move list that rebuilds the board at any point.
///
/// The cursor is the index of the last applied move; `-1` means none. It
/// starts on the final move and every movement is clamped to `-1..=last`.
#[derive(Debug, Clone)]
pub struct HistoryPlayer {
    initial: Board,
    moves: Vec<PlayedMove>,
    cursor: isize,
}

impl HistoryPlayer {
    /// Replays `moves` from the standard starting position.
    pub fn new(moves: Vec<PlayedMove>) -> Self {
        Self::from_position(Board::new(), moves)
    }

    /// Replays `moves` from `initial`.
    pub fn from_position(initial: Board, moves: Vec<PlayedMove>) -> Self {
        let cursor = moves.len() as isize - 1;
        HistoryPlayer {
            initial,
            moves,
            cursor,
        }
    }

    pub fn moves(&self) -> &[PlayedMove] {
        &self.moves
    }

    #[inline]
    pub fn cursor(&self) -> isize {
        self.cursor
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    fn last(&self) -> isize {
        self.moves.len() as isize - 1
    }

    pub fn step_forward(&mut self) -> PlayResult {
        self.seek(self.cursor + 1)
    }

    pub fn step_back(&mut self) -> PlayResult {
        self.seek(self.cursor - 1)
    }

    pub fn seek_start(&mut self) -> PlayResult {
        self.seek(-1)
    }

    pub fn seek_end(&mut self) -> PlayResult {
        self.seek(self.last())
    }

    /// Moves the cursor to `index`, clamped, and rebuilds the board there.
    pub fn seek(&mut self, index: isize) -> PlayResult {
        self.cursor = index.clamp(-1, self.last());
        self.current()
    }

    /// Rebuilds the board at the cursor without moving it.
    pub fn current(&self) -> PlayResult {
        let mut board = self.initial.clone();
        let applied = usize::try_from(self.cursor + 1).unwrap_or(0);
        for played in &self.moves[..applied] {
            replay(&mut board, played);
        }
        PlayResult {
            board,
            played: applied.checked_sub(1).map(|i| self.moves[i].clone()),
        }
    }
}

/// Applies a recorded move to `board`.
pub(crate) fn replay(board: &mut Board, played: &PlayedMove) {
    if played.is_castling {
        board.make_castle(played.color(), played.is_king_side_castle);
    } else {
        board.make(played.src, played.dst, played.promoted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Game;
    use chess_core::Square;

    fn game_after(moves: &str) -> Game {
        let mut game = Game::new();
        for m in moves.split_whitespace() {
            game.apply_str(m).unwrap();
        }
        game
    }

    #[test]
    fn starts_on_last_move() {
        let game = game_after("e2e4 e7e5 g1f3");
        let mut player = game.history_player();
        assert_eq!(player.cursor(), 2);
        let result = player.current();
        assert_eq!(&result.board, game.board());
        assert_eq!(result.played.map(|m| m.dst), Some("f3".parse().unwrap()));
    }

    #[test]
    fn stepping_and_clamping() {
        let game = game_after("e2e4 e7e5");
        let mut player = game.history_player();

        let end = player.step_forward();
        assert_eq!(player.cursor(), 1);
        assert_eq!(&end.board, game.board());

        let back = player.step_back();
        assert_eq!(player.cursor(), 0);
        assert!(back.board.get("e4".parse().unwrap()).is_some());
        assert!(back.board.get("e5".parse().unwrap()).is_none());

        let start = player.seek(-10);
        assert_eq!(player.cursor(), -1);
        assert_eq!(start.board, Board::new());
        assert_eq!(start.played, None);
        player.step_back();
        assert_eq!(player.cursor(), -1);

        player.seek(99);
        assert_eq!(player.cursor(), 1);
        assert_eq!(&player.seek_start().board, &Board::new());
        assert_eq!(&player.seek_end().board, game.board());
    }

    #[test]
    fn replays_castling_en_passant_and_promotion() {
        let mut game = Game::from_fen("r3k3/1P6/8/8/4p3/8/3P4/R3K3 w Qq - 0 1").unwrap();
        for m in ["d2d4", "e4d3", "e1c1", "e8f7", "b7a8q"] {
            game.apply_str(m).unwrap();
        }
        assert_eq!(game.move_count(), 5);
        let player = game.history_player();
        assert_eq!(&player.current().board, game.board());
        assert_eq!(game.board().get(Square::C1).map(|p| p.is_king()), Some(true));
    }

    #[test]
    fn empty_history() {
        let mut player = HistoryPlayer::new(Vec::new());
        assert_eq!(player.cursor(), -1);
        assert_eq!(player.step_forward().board, Board::new());
        assert_eq!(player.cursor(), -1);
    }
}
