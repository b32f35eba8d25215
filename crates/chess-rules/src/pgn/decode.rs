//! Turning ply tokens back into recorded moves.
//!
//! The decoder keeps its own board, side to move and castling rights, and
//! resolves each token against them. Check, mate and stalemate are judged
//! on the board after each ply, whatever markers the token carries; the
//! result token marks the winner of a game that ended any other way.

use super::lexer::RawGame;
use super::san::{strip_glyphs, SanMove};
use super::{PgnError, PgnGame};
use crate::board::{square, Board};
use crate::game::promotion_ordinal;
use crate::oracle::{self, MoveOracle};
use crate::played_move::{Disambiguation, PlayedMove};
use crate::rules::{self, CastlingRights};
use chess_core::{Color, Fen, Piece, PieceKind, Square};
use tracing::{debug, trace};

struct Decoder {
    game: usize,
    board: Board,
    side: Color,
    rights: CastlingRights,
    /// Pieces lost so far, indexed by their color.
    lost: [Vec<Piece>; 2],
    /// Set once a ply mates or stalemates.
    over: bool,
}

/// Why one token could not be resolved, before the board is attached.
struct Failure {
    reason: String,
    attempts: Vec<String>,
}

impl Failure {
    fn new(reason: impl Into<String>) -> Self {
        Failure {
            reason: reason.into(),
            attempts: Vec::new(),
        }
    }
}

/// Decodes one game. `game` is its 1-based position in the input.
pub(crate) fn decode_game(game: usize, raw: RawGame) -> Result<PgnGame, PgnError> {
    let (board, side, rights) = match raw.tags.fen() {
        Some(fen) => {
            let parsed = Fen::parse(fen).map_err(|source| PgnError::InvalidFen { game, source })?;
            let board = Board::from_parsed_fen(&parsed).map_err(|source| PgnError::InvalidFen { game, source })?;
            let rights = CastlingRights::from_fen_letters(&parsed.castling);
            (board, parsed.side_to_move, rights)
        }
        None => (Board::new(), Color::White, CastlingRights::ALL),
    };

    let initial = board.clone();
    let initial_player = side;
    let mut decoder = Decoder {
        game,
        board,
        side,
        rights,
        lost: [Vec::new(), Vec::new()],
        over: false,
    };
    decoder.over = rules::is_checkmate(&mut decoder.board, side)
        || rules::is_stalemate(&mut decoder.board, rights, side);

    let mut moves: Vec<PlayedMove> = Vec::with_capacity(raw.plies.len());
    for (text, line) in &raw.plies {
        let token = strip_glyphs(text);
        if token.is_empty() {
            continue;
        }
        let san = SanMove::parse(token).ok_or_else(|| PgnError::InvalidToken {
            game,
            line: *line,
            token: text.clone(),
        })?;
        let ply = moves.len() + 1;
        let played = decoder.play(&san).map_err(|failure| PgnError::Decode {
            game,
            ply,
            token: text.clone(),
            reason: failure.reason,
            board: decoder.board.to_string(),
            attempts: failure.attempts,
        })?;
        trace!(game, ply, san = %played, "decoded ply");
        moves.push(played);
    }

    if let Some(last) = moves.last_mut().filter(|last| !last.is_terminal()) {
        match raw.result.as_deref() {
            Some("1/2-1/2") => last.is_draw = true,
            Some(marker) => last.winner = Color::from_win_marker(marker),
            None => {}
        }
    }

    debug!(game = decoder.game, plies = moves.len(), result = ?raw.result, "decoded game");
    Ok(PgnGame {
        tags: raw.tags,
        initial,
        initial_player,
        initial_rights: rights,
        moves,
        result: raw.result,
    })
}

impl Decoder {
    fn play(&mut self, san: &SanMove) -> Result<PlayedMove, Failure> {
        if self.over {
            return Err(Failure::new("the game is already over"));
        }
        let mut played = match *san {
            SanMove::Castle { king_side, .. } => {
                rules::check_castling(&mut self.board, self.rights, self.side, king_side)
                    .map_err(|refusal| Failure::new(format!("cannot castle: {}", refusal)))?;
                let (src, dst) = self.board.castle(self.side, king_side);
                self.rights.remove_color(self.side);
                PlayedMove::castling(Piece::king(self.side), src, dst, king_side)
            }
            SanMove::Normal {
                kind,
                from_file,
                from_rank,
                dst,
                promotion,
                capture,
                ..
            } => {
                let src = self.resolve(kind, from_file, from_rank, dst)?;
                if capture && !self.takes_something(src, dst) {
                    return Err(Failure::new(format!("nothing to capture on {}", dst)));
                }
                let mut played = self.step(src, dst, promotion)?;
                if kind != PieceKind::Pawn {
                    played.disambiguation = match (from_file, from_rank) {
                        (Some(_), Some(_)) => Some(Disambiguation::Square(src)),
                        (Some(_), None) => Some(Disambiguation::File(src.file_char())),
                        (None, Some(_)) => Some(Disambiguation::Rank(src.rank_char())),
                        (None, None) => None,
                    };
                }
                played
            }
        };
        let mover = self.side;
        let opponent = mover.opposite();
        played.is_check = rules::in_check(&self.board, opponent);
        played.is_mate = played.is_check && rules::is_checkmate(&mut self.board, opponent);
        if played.is_mate {
            played.winner = Some(mover);
            self.over = true;
        } else if !played.is_check && !rules::has_legal_move(&mut self.board, self.rights, opponent) {
            played.is_draw = true;
            self.over = true;
        }
        if (san.check(), san.mate()) != (played.is_check, played.is_mate) {
            debug!(game = self.game, san = %played, "check marker disagrees with the position");
        }
        self.side = opponent;
        Ok(played)
    }

    /// Finds the one square the named piece can move from.
    fn resolve(
        &mut self,
        kind: PieceKind,
        from_file: Option<u8>,
        from_rank: Option<u8>,
        dst: Square,
    ) -> Result<Square, Failure> {
        let oracle = MoveOracle::new();

        if let (Some(file), Some(rank)) = (from_file, from_rank) {
            let src = square(file, rank);
            return match self.board.get(src) {
                Some(piece) if piece.kind == kind && piece.color == self.side => {
                    if oracle.is_legal_for(&self.board, piece, src, dst) {
                        Ok(src)
                    } else {
                        Err(Failure::new(format!("{} cannot move from {} to {}", piece, src, dst)))
                    }
                }
                _ => Err(Failure::new(format!("no {} {} on {}", self.side, kind, src))),
            };
        }

        let candidates: Vec<(Square, Piece)> = self
            .board
            .pieces_of(self.side)
            .into_iter()
            .filter(|(sq, piece)| {
                piece.kind == kind
                    && from_file.map_or(true, |f| sq.x() == f)
                    && from_rank.map_or(true, |r| sq.y() == r)
            })
            .collect();

        let mut attempts = Vec::new();
        let mut reachable = Vec::new();
        for (sq, piece) in &candidates {
            if oracle.is_legal_for(&self.board, *piece, *sq, dst) {
                reachable.push(*sq);
            } else {
                attempts.push(format!("{} on {}: cannot reach {}", piece, sq, dst));
            }
        }

        // A hinted source only needs the king-safety filter to break ties.
        let needs_safety = (from_file.is_none() && from_rank.is_none()) || reachable.len() > 1;
        let legal: Vec<Square> = if needs_safety {
            let mut legal = Vec::new();
            for sq in reachable {
                if rules::keeps_king_safe(&mut self.board, sq, dst) {
                    legal.push(sq);
                } else {
                    attempts.push(format!("from {}: leaves the king in check", sq));
                }
            }
            legal
        } else {
            reachable
        };

        match legal.as_slice() {
            [src] => Ok(*src),
            [] => Err(Failure {
                reason: format!("no {} {} can move to {}", self.side, kind, dst),
                attempts,
            }),
            many => Err(Failure {
                reason: format!(
                    "ambiguous: {} {}s on {} can all move to {}",
                    self.side,
                    kind,
                    many.iter().map(Square::to_string).collect::<Vec<_>>().join(", "),
                    dst
                ),
                attempts,
            }),
        }
    }

    fn takes_something(&self, src: Square, dst: Square) -> bool {
        self.board.get(dst).is_some()
            || self
                .board
                .get(src)
                .is_some_and(|mover| oracle::is_en_passant(&self.board, mover, src, dst))
    }

    fn step(&mut self, src: Square, dst: Square, promotion: Option<PieceKind>) -> Result<PlayedMove, Failure> {
        let Some(mover) = self.board.get(src) else {
            return Err(Failure::new(format!("no piece on {}", src)));
        };
        let promotes = mover.is_pawn() && dst.y() == mover.color.promotion_rank();
        let promoted = match (promotes, promotion) {
            (true, Some(kind)) => {
                let ordinal = promotion_ordinal(&self.board, &self.lost[mover.color.index()], kind, mover.color);
                Some(Piece::new(kind, mover.color, ordinal))
            }
            (true, None) => return Err(Failure::new("pawn reaches the last rank without a promotion")),
            (false, Some(kind)) => return Err(Failure::new(format!("unexpected promotion to {}", kind))),
            (false, None) => None,
        };

        let undo = self.board.make(src, dst, promoted);
        let captured = undo.captured();
        if let Some(victim) = captured {
            self.lost[victim.color.index()].push(victim);
        }
        self.rights.record_move(mover, src, dst);

        let mut played = PlayedMove::new(mover, src, dst);
        played.captured = captured;
        played.promoted = promoted;
        Ok(played)
    }
}
