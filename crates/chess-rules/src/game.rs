//! Game state machine.
//!
//! The [`Game`] struct owns the board and enforces turn order and the full
//! rules on every proposal:
//! - legality through the move oracle, plus the discovered-check filter
//! - castling eligibility
//! - the promotion pause
//! - check, checkmate, and stalemate after each accepted move
//!
//! Observers connect to [`Game::signals_mut`] and hear about every state
//! change as it happens.

use crate::board::Board;
use crate::capturables::Capturables;
use crate::config::GameConfig;
use crate::history::HistoryPlayer;
use crate::oracle::{self, MoveOracle};
use crate::played_move::{Disambiguation, PlayedMove};
use crate::rules::{self, CastlingRefusal, CastlingRights};
use crate::signals::{Event, GameSignals, MoveSnapshot};
use chess_core::{Color, Fen, FenError, ParseError, Piece, PieceKind, Proposal, Square};
use std::ops::{Deref, DerefMut};
use thiserror::Error;
use tracing::{debug, info};

/// Blocks a game's signals until dropped.
struct Muted<'a> {
    game: &'a mut Game,
    previous: bool,
}

impl<'a> Muted<'a> {
    fn new(game: &'a mut Game) -> Self {
        let previous = game.signals.set_blocked(true);
        Muted { game, previous }
    }
}

impl Deref for Muted<'_> {
    type Target = Game;

    fn deref(&self) -> &Game {
        &*self.game
    }
}

impl DerefMut for Muted<'_> {
    fn deref_mut(&mut self) -> &mut Game {
        &mut *self.game
    }
}

impl Drop for Muted<'_> {
    fn drop(&mut self) {
        self.game.signals.set_blocked(self.previous);
    }
}

/// Why a proposal was turned down.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("the game is over")]
    GameOver,

    #[error("no piece on {0}")]
    EmptySource(Square),

    #[error("the piece on {0} belongs to the player not on move")]
    WrongColor(Square),

    #[error("illegal move: {0}")]
    Illegal(Proposal),

    #[error("move {0} would leave the king in check")]
    LeavesKingInCheck(Proposal),

    #[error("castling not allowed: {0}")]
    CastlingNotAllowed(CastlingRefusal),

    #[error("a pawn cannot promote to {0}")]
    InvalidPromotion(PieceKind),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// What became of an accepted proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Played(PlayedMove),
    /// Nothing was moved; resend the proposal with a promotion choice.
    PromotionRequired(Proposal),
}

impl MoveOutcome {
    pub fn played(&self) -> Option<&PlayedMove> {
        match self {
            MoveOutcome::Played(played) => Some(played),
            MoveOutcome::PromotionRequired(_) => None,
        }
    }
}

/// Where the game stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Checkmate { winner: Color },
    Stalemate,
    Resigned { winner: Color },
}

impl GameStatus {
    #[inline]
    pub fn is_over(self) -> bool {
        self != GameStatus::Ongoing
    }

    pub fn winner(self) -> Option<Color> {
        match self {
            GameStatus::Checkmate { winner } | GameStatus::Resigned { winner } => Some(winner),
            GameStatus::Ongoing | GameStatus::Stalemate => None,
        }
    }
}

/// Ordinal one past every piece of that kind and color, lost or on the board.
pub(crate) fn promotion_ordinal(board: &Board, lost: &[Piece], kind: PieceKind, color: Color) -> u8 {
    let lost = lost
        .iter()
        .filter(|p| p.kind == kind && p.color == color)
        .map(|p| p.ordinal + 1)
        .max()
        .unwrap_or(0);
    board.next_ordinal(kind, color).max(lost)
}

/// A single game of chess from its first position to its end.
#[derive(Debug)]
pub struct Game {
    board: Board,
    initial_board: Board,
    initial_player: Color,
    initial_rights: CastlingRights,
    current: Color,
    move_count: usize,
    /// Pieces lost, indexed by their color.
    captured: [Vec<Piece>; 2],
    capturables: Capturables,
    /// Pieces giving check, indexed by their color.
    checking: [Vec<Piece>; 2],
    rights: CastlingRights,
    default_promotion: [Option<PieceKind>; 2],
    pending_promotion: Option<Proposal>,
    status: GameStatus,
    history: Vec<PlayedMove>,
    standard: bool,
    signals: GameSignals,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a game from the standard starting position.
    pub fn new() -> Self {
        Self::from_board(Board::new(), Color::White, CastlingRights::ALL, true)
    }

    /// Creates a game from a Chess960 starting position.
    pub fn chess960() -> Self {
        Self::from_board(Board::chess960(), Color::White, CastlingRights::ALL, false)
    }

    /// Creates a game from a configuration.
    pub fn with_config(config: &GameConfig) -> Self {
        let mut game = if config.standard {
            Game::new()
        } else {
            Game::chess960()
        };
        for color in Color::ALL {
            game.default_promotion[color.index()] = config.promotion.get(color);
        }
        game
    }

    /// Creates a game from a FEN record.
    ///
    /// Placement, side to move, castling letters and the en passant target
    /// are read. A position that is already mate or stalemate yields a game
    /// that is over.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parsed = Fen::parse(fen)?;
        let board = Board::from_parsed_fen(&parsed)?;
        let rights = CastlingRights::from_fen_letters(&parsed.castling);
        Ok(Self::from_board(board, parsed.side_to_move, rights, true))
    }

    fn from_board(board: Board, player: Color, rights: CastlingRights, standard: bool) -> Self {
        let mut game = Game {
            initial_board: board.clone(),
            board,
            initial_player: player,
            initial_rights: rights,
            current: player,
            move_count: 0,
            captured: [Vec::new(), Vec::new()],
            capturables: Capturables::default(),
            checking: [Vec::new(), Vec::new()],
            rights,
            default_promotion: [None, None],
            pending_promotion: None,
            status: GameStatus::Ongoing,
            history: Vec::new(),
            standard,
            signals: GameSignals::default(),
        };
        game.refresh_threats();
        game.status = game.evaluate_position();
        game
    }

    /// Returns to the position the game started from.
    pub fn reset(&mut self) {
        self.board = self.initial_board.clone();
        self.current = self.initial_player;
        self.rights = self.initial_rights;
        self.clear_progress();
        info!(standard = self.standard, "game reset");
    }

    /// Starts over from a fresh standard or Chess960 position.
    pub fn reset_board(&mut self, standard: bool) {
        self.board.reset(standard);
        self.initial_board = self.board.clone();
        self.initial_player = Color::White;
        self.initial_rights = CastlingRights::ALL;
        self.current = Color::White;
        self.rights = CastlingRights::ALL;
        self.standard = standard;
        self.clear_progress();
        info!(standard, "board reset");
        if !standard {
            self.signals.dispatch(Event::NonStandardBoardSet);
        }
    }

    fn clear_progress(&mut self) {
        self.move_count = 0;
        self.captured = [Vec::new(), Vec::new()];
        self.pending_promotion = None;
        self.history.clear();
        self.refresh_threats();
        self.status = self.evaluate_position();
    }

    /// Proposes a move for the player on move.
    ///
    /// A rejected proposal leaves the game untouched and emits
    /// [`Event::InvalidMove`].
    pub fn apply(&mut self, proposal: impl Into<Proposal>) -> Result<MoveOutcome, MoveError> {
        let proposal = proposal.into();
        match self.try_apply(proposal) {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                debug!(%proposal, reason = %err, "move rejected");
                self.signals.dispatch(Event::InvalidMove);
                Err(err)
            }
        }
    }

    /// Proposes a move written as `e2e4` or `e7e8q`.
    pub fn apply_str(&mut self, text: &str) -> Result<MoveOutcome, MoveError> {
        match text.parse::<Proposal>() {
            Ok(proposal) => self.apply(proposal),
            Err(err) => {
                debug!(text, reason = %err, "unreadable proposal");
                self.signals.dispatch(Event::InvalidMove);
                Err(err.into())
            }
        }
    }

    /// Plays a sequence of proposals, emitting events only for the last one.
    ///
    /// Stops at the first rejected proposal.
    pub fn apply_all<I, P>(&mut self, proposals: I) -> Result<Vec<MoveOutcome>, MoveError>
    where
        I: IntoIterator<Item = P>,
        P: Into<Proposal>,
    {
        let mut proposals: Vec<Proposal> = proposals.into_iter().map(Into::into).collect();
        let Some(last) = proposals.pop() else {
            return Ok(Vec::new());
        };
        let mut outcomes = self.with_signals_blocked(|game| {
            proposals
                .into_iter()
                .map(|proposal| game.apply(proposal))
                .collect::<Result<Vec<_>, _>>()
        })?;
        outcomes.push(self.apply(last)?);
        Ok(outcomes)
    }

    /// Runs `f` with every event dropped.
    ///
    /// The previous blocking state comes back even if `f` panics.
    pub fn with_signals_blocked<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let mut muted = Muted::new(self);
        f(&mut *muted)
    }

    fn try_apply(&mut self, proposal: Proposal) -> Result<MoveOutcome, MoveError> {
        if self.status.is_over() {
            return Err(MoveError::GameOver);
        }
        let Proposal { src, dst, .. } = proposal;
        let piece = self.board.get(src).ok_or(MoveError::EmptySource(src))?;
        if piece.color != self.current {
            return Err(MoveError::WrongColor(src));
        }

        if oracle::is_castling_shape(piece, src, dst) {
            let king_side = dst.x() > src.x();
            rules::check_castling(&mut self.board, self.rights, piece.color, king_side)
                .map_err(MoveError::CastlingNotAllowed)?;
            return Ok(MoveOutcome::Played(self.commit_castle(piece, king_side)));
        }

        if !MoveOracle::new().is_legal_for(&self.board, piece, src, dst) {
            return Err(MoveError::Illegal(proposal));
        }
        if !rules::keeps_king_safe(&mut self.board, src, dst) {
            return Err(MoveError::LeavesKingInCheck(proposal));
        }

        let mut promoted = None;
        if piece.is_pawn() && dst.y() == piece.color.promotion_rank() {
            let choice = proposal
                .promotion
                .or(self.default_promotion[piece.color.index()]);
            match choice {
                None => {
                    debug!(%proposal, "promotion required");
                    self.pending_promotion = Some(proposal);
                    self.signals.dispatch(Event::PromotionRequired(proposal));
                    return Ok(MoveOutcome::PromotionRequired(proposal));
                }
                Some(kind) if !kind.is_promotion_target() => {
                    return Err(MoveError::InvalidPromotion(kind));
                }
                Some(kind) => {
                    let ordinal = self.next_promotion_ordinal(kind, piece.color);
                    promoted = Some(Piece::new(kind, piece.color, ordinal));
                }
            }
        }

        Ok(MoveOutcome::Played(self.commit_step(piece, src, dst, promoted)))
    }

    fn next_promotion_ordinal(&self, kind: PieceKind, color: Color) -> u8 {
        promotion_ordinal(&self.board, &self.captured[color.index()], kind, color)
    }

    /// Extra source information a sibling of `piece` makes necessary.
    fn disambiguation(&self, piece: Piece, src: Square, dst: Square) -> Option<Disambiguation> {
        if piece.is_pawn() {
            return None;
        }
        let siblings: Vec<Square> = self
            .board
            .pieces()
            .filter(|(sq, other)| {
                *other != piece
                    && other.kind == piece.kind
                    && other.color == piece.color
                    && MoveOracle::without_dst_check().is_legal_for(&self.board, *other, *sq, dst)
            })
            .map(|(sq, _)| sq)
            .collect();
        match siblings.as_slice() {
            [] => None,
            [other] if other.x() == src.x() => Some(Disambiguation::Rank(src.rank_char())),
            [_] => Some(Disambiguation::File(src.file_char())),
            _ => Some(Disambiguation::Square(src)),
        }
    }

    fn commit_step(&mut self, piece: Piece, src: Square, dst: Square, promoted: Option<Piece>) -> PlayedMove {
        let disambiguation = self.disambiguation(piece, src, dst);
        let captured = self.board.move_piece(src, dst);
        if let Some(new_piece) = promoted {
            self.board.promote(new_piece, dst);
        }
        self.rights.record_move(piece, src, dst);
        if let Some(victim) = captured {
            self.captured[victim.color.index()].push(victim);
        }

        let mut played = PlayedMove::new(piece, src, dst);
        played.captured = captured;
        played.disambiguation = disambiguation;
        played.promoted = promoted;
        self.finish_move(played)
    }

    fn commit_castle(&mut self, king: Piece, king_side: bool) -> PlayedMove {
        let (src, dst) = self.board.castle(king.color, king_side);
        self.rights.remove_color(king.color);
        self.finish_move(PlayedMove::castling(king, src, dst, king_side))
    }

    /// Updates threats, records the move, and announces the result.
    fn finish_move(&mut self, mut played: PlayedMove) -> PlayedMove {
        let mover = played.color();
        let opponent = mover.opposite();
        self.refresh_threats();

        played.is_check = !self.checking[mover.index()].is_empty();
        played.is_mate = played.is_check && rules::is_checkmate(&mut self.board, opponent);
        let stalemate =
            !played.is_check && !rules::has_legal_move(&mut self.board, self.rights, opponent);
        if played.is_mate {
            played.winner = Some(mover);
            self.status = GameStatus::Checkmate { winner: mover };
        } else if stalemate {
            played.is_draw = true;
            self.status = GameStatus::Stalemate;
        } else {
            self.current = opponent;
        }

        debug!(piece = %played.piece, src = %played.src, dst = %played.dst, san = %played.san(), "move accepted");
        self.move_count += 1;
        self.pending_promotion = None;
        self.history.push(played.clone());

        let snapshot = self.snapshot(played.src, played.dst);
        self.signals.dispatch(Event::MoveAccepted(Box::new(snapshot)));
        match self.status {
            GameStatus::Checkmate { winner } => {
                info!(%winner, moves = self.move_count, "checkmate");
                self.signals.dispatch(Event::Mate(winner));
            }
            GameStatus::Stalemate => {
                info!(moves = self.move_count, "stalemate");
                self.signals.dispatch(Event::Stalemate);
            }
            GameStatus::Ongoing | GameStatus::Resigned { .. } => {
                self.signals.dispatch(Event::PlayerChanged(self.current));
            }
        }
        played
    }

    fn refresh_threats(&mut self) {
        self.capturables = Capturables::compute(&self.board);
        for color in Color::ALL {
            let king = Piece::king(color.opposite());
            self.checking[color.index()] = self
                .capturables
                .of(color)
                .iter()
                .filter(|(_, victims)| victims.contains(&king))
                .map(|(attacker, _)| *attacker)
                .collect();
        }
    }

    /// Status of the player on move, judged without any move having been made.
    fn evaluate_position(&mut self) -> GameStatus {
        let player = self.current;
        if rules::is_checkmate(&mut self.board, player) {
            GameStatus::Checkmate {
                winner: player.opposite(),
            }
        } else if rules::is_stalemate(&mut self.board, self.rights, player) {
            GameStatus::Stalemate
        } else {
            GameStatus::Ongoing
        }
    }

    fn snapshot(&self, src: Square, dst: Square) -> MoveSnapshot {
        let (leader, lead) = self.material_lead();
        MoveSnapshot {
            src,
            dst,
            captured_white: self.captured[Color::White.index()].clone(),
            captured_black: self.captured[Color::Black.index()].clone(),
            leader,
            lead,
            move_history: self.history.clone(),
            capturables: self.capturables.clone(),
        }
    }

    /// The side ahead in captured material and by how many points.
    pub fn material_lead(&self) -> (Option<Color>, u32) {
        let won = |color: Color| -> u32 {
            self.captured[color.opposite().index()]
                .iter()
                .map(|p| p.worth())
                .sum()
        };
        let (white, black) = (won(Color::White), won(Color::Black));
        match white.cmp(&black) {
            std::cmp::Ordering::Greater => (Some(Color::White), white - black),
            std::cmp::Ordering::Less => (Some(Color::Black), black - white),
            std::cmp::Ordering::Equal => (None, 0),
        }
    }

    /// Ends the game with `color` giving up.
    pub fn resign(&mut self, color: Color) -> Result<(), MoveError> {
        if self.status.is_over() {
            return Err(MoveError::GameOver);
        }
        let winner = color.opposite();
        self.status = GameStatus::Resigned { winner };
        self.pending_promotion = None;
        if let Some(last) = self.history.last_mut() {
            last.winner = Some(winner);
        }
        info!(loser = %color, %winner, "resigned");
        self.signals.dispatch(Event::Resigned(winner));
        Ok(())
    }

    /// Sets the kind a pawn of `color` becomes without asking.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::InvalidPromotion`] for pawns and kings.
    pub fn set_default_promotion(&mut self, color: Color, kind: Option<PieceKind>) -> Result<(), MoveError> {
        if let Some(kind) = kind.filter(|k| !k.is_promotion_target()) {
            return Err(MoveError::InvalidPromotion(kind));
        }
        self.default_promotion[color.index()] = kind;
        Ok(())
    }

    /// Returns true if the player on move may play `src` to `dst`.
    pub fn is_move_legal(&self, src: Square, dst: Square) -> bool {
        if self.status.is_over() || self.board.get(src).map(|p| p.color) != Some(self.current) {
            return false;
        }
        rules::is_move_legal(&mut self.board.clone(), self.rights, src, dst)
    }

    /// Every move the player on move may make.
    pub fn legal_moves(&self) -> Vec<(Square, Square)> {
        if self.status.is_over() {
            return Vec::new();
        }
        rules::legal_moves(&mut self.board.clone(), self.rights, self.current)
    }

    /// A replayer over the moves played so far.
    pub fn history_player(&self) -> HistoryPlayer {
        HistoryPlayer::from_position(self.initial_board.clone(), self.history.clone())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The position the game started from.
    pub fn initial_board(&self) -> &Board {
        &self.initial_board
    }

    pub fn initial_player(&self) -> Color {
        self.initial_player
    }

    /// Castling rights at the start of the game.
    pub fn initial_castling_rights(&self) -> CastlingRights {
        self.initial_rights
    }

    pub fn current_player(&self) -> Color {
        self.current
    }

    /// Number of accepted plies.
    pub fn move_count(&self) -> usize {
        self.move_count
    }

    /// Pieces of `color` that have been captured, oldest first.
    pub fn captured(&self, color: Color) -> &[Piece] {
        &self.captured[color.index()]
    }

    pub fn capturables(&self) -> &Capturables {
        &self.capturables
    }

    /// Pieces of `color` giving check right now.
    pub fn checking(&self, color: Color) -> &[Piece] {
        &self.checking[color.index()]
    }

    /// Returns true if the player on move is in check.
    pub fn is_check(&self) -> bool {
        !self.checking[self.current.opposite().index()].is_empty()
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.rights
    }

    pub fn default_promotion(&self, color: Color) -> Option<PieceKind> {
        self.default_promotion[color.index()]
    }

    /// The proposal waiting for a promotion choice, if any.
    pub fn pending_promotion(&self) -> Option<Proposal> {
        self.pending_promotion
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status.is_over()
    }

    pub fn winner(&self) -> Option<Color> {
        self.status.winner()
    }

    /// Returns true unless the game started from a Chess960 shuffle.
    pub fn is_standard(&self) -> bool {
        self.standard
    }

    pub fn history(&self) -> &[PlayedMove] {
        &self.history
    }

    pub fn signals(&self) -> &GameSignals {
        &self.signals
    }

    pub fn signals_mut(&mut self) -> &mut GameSignals {
        &mut self.signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn play(game: &mut Game, moves: &str) {
        for m in moves.split_whitespace() {
            game.apply_str(m).unwrap_or_else(|e| panic!("{}: {}", m, e));
        }
    }

    fn record_events(game: &mut Game) -> Rc<RefCell<Vec<Event>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        game.signals_mut()
            .any
            .connect(move |event| sink.borrow_mut().push(event.clone()));
        events
    }

    #[test]
    fn new_game() {
        let game = Game::new();
        assert_eq!(game.current_player(), Color::White);
        assert_eq!(game.move_count(), 0);
        assert_eq!(game.status(), GameStatus::Ongoing);
        assert!(game.is_standard());
        assert_eq!(game.legal_moves().len(), 20);
    }

    #[test]
    fn turns_alternate() {
        let mut game = Game::new();
        assert_eq!(game.apply_str("e7e5"), Err(MoveError::WrongColor(sq("e7"))));
        play(&mut game, "e2e4");
        assert_eq!(game.current_player(), Color::Black);
        assert_eq!(game.apply_str("d2d4"), Err(MoveError::WrongColor(sq("d2"))));
    }

    #[test]
    fn rejections_leave_state_and_emit_invalid_move() {
        let mut game = Game::new();
        let events = record_events(&mut game);
        let before = game.board().clone();

        assert_eq!(game.apply_str("e4e5"), Err(MoveError::EmptySource(sq("e4"))));
        assert!(matches!(game.apply_str("e2e5"), Err(MoveError::Illegal(_))));
        assert!(matches!(game.apply_str("e2"), Err(MoveError::Parse(_))));

        assert_eq!(game.board(), &before);
        assert_eq!(game.move_count(), 0);
        assert_eq!(*events.borrow(), vec![Event::InvalidMove; 3]);
    }

    #[test]
    fn pinned_piece_cannot_move() {
        let mut game = Game::from_fen("4r1k1/8/8/8/8/8/4B3/4K3 w - - 0 1").unwrap();
        assert!(matches!(
            game.apply_str("e2d3"),
            Err(MoveError::LeavesKingInCheck(_))
        ));
        assert!(!game.is_move_legal(sq("e2"), sq("d3")));
        assert!(game.is_move_legal(Square::E1, Square::D1));
    }

    #[test]
    fn accepted_move_events_in_order() {
        let mut game = Game::new();
        let events = record_events(&mut game);
        play(&mut game, "e2e4");
        let events = events.borrow();
        assert_eq!(events.len(), 2);
        match &events[0] {
            Event::MoveAccepted(snapshot) => {
                assert_eq!(snapshot.src, sq("e2"));
                assert_eq!(snapshot.dst, sq("e4"));
                assert_eq!(snapshot.move_history.len(), 1);
                assert_eq!(snapshot.leader, None);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(events[1], Event::PlayerChanged(Color::Black));
    }

    #[test]
    fn fools_mate() {
        let mut game = Game::new();
        let events = record_events(&mut game);
        play(&mut game, "f2f3 e7e5 g2g4 d8h4");
        assert_eq!(game.status(), GameStatus::Checkmate { winner: Color::Black });
        let last = game.history().last().unwrap();
        assert!(last.is_check && last.is_mate);
        assert_eq!(last.winner, Some(Color::Black));
        assert_eq!(events.borrow().last(), Some(&Event::Mate(Color::Black)));
        assert_eq!(game.apply_str("a2a3"), Err(MoveError::GameOver));
        assert!(game.legal_moves().is_empty());
    }

    #[test]
    fn check_is_recorded() {
        let mut game = Game::new();
        play(&mut game, "e2e4 f7f6 d1h5");
        assert!(game.history().last().unwrap().is_check);
        assert!(!game.history().last().unwrap().is_mate);
        assert!(game.is_check());
        assert_eq!(game.checking(Color::White).len(), 1);
    }

    #[test]
    fn captures_and_material() {
        let mut game = Game::new();
        play(&mut game, "e2e4 d7d5 e4d5 d8d5 b1c3");
        assert_eq!(game.captured(Color::Black).len(), 1);
        assert_eq!(game.captured(Color::White).len(), 1);
        assert_eq!(game.material_lead(), (None, 0));
        play(&mut game, "d5a2");
        assert_eq!(game.material_lead(), (Some(Color::Black), 1));
    }

    #[test]
    fn castling_rejected_does_not_fall_back() {
        let mut game = Game::new();
        play(&mut game, "e2e4 e7e5 g1f3 b8c6");
        assert!(matches!(
            game.apply_str("e1g1"),
            Err(MoveError::CastlingNotAllowed(CastlingRefusal::PathBlocked))
        ));
        assert_eq!(game.board().get(Square::E1), Some(Piece::king(Color::White)));
    }

    #[test]
    fn rook_move_loses_only_its_side() {
        let mut game = Game::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        play(&mut game, "h1g1 a7a6 g1h1 a6a5");
        assert!(matches!(
            game.apply_str("e1g1"),
            Err(MoveError::CastlingNotAllowed(CastlingRefusal::AlreadyMoved))
        ));
        play(&mut game, "e1c1");
        assert_eq!(game.board().get(Square::C1), Some(Piece::king(Color::White)));
        assert_eq!(game.board().get(Square::D1).map(|p| p.kind), Some(PieceKind::Rook));
        let last = game.history().last().unwrap();
        assert!(last.is_castling && !last.is_king_side_castle);
        assert_eq!(last.san(), "O-O-O");
    }

    #[test]
    fn default_promotion_skips_prompt() {
        let mut game = Game::from_fen("k7/4P3/8/8/8/8/8/K7 w - - 0 1").unwrap();
        game.set_default_promotion(Color::White, Some(PieceKind::Knight)).unwrap();
        let outcome = game.apply_str("e7e8").unwrap();
        let played = outcome.played().unwrap();
        assert_eq!(played.promoted, Some(Piece::new(PieceKind::Knight, Color::White, 0)));
        assert!(matches!(
            game.set_default_promotion(Color::White, Some(PieceKind::King)),
            Err(MoveError::InvalidPromotion(PieceKind::King))
        ));
    }

    #[test]
    fn promotion_ordinal_skips_lost_pieces() {
        let mut game = Game::from_fen("k7/4P3/8/8/8/8/8/KQ4q1 b - - 0 1").unwrap();
        play(&mut game, "g1b1 a1b1 a8b7");
        assert_eq!(game.captured(Color::White), &[Piece::new(PieceKind::Queen, Color::White, 0)]);
        let outcome = game.apply_str("e7e8q").unwrap();
        assert_eq!(
            outcome.played().unwrap().promoted,
            Some(Piece::new(PieceKind::Queen, Color::White, 1))
        );
    }

    #[test]
    fn disambiguation_by_file_and_rank() {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/8/R4RK1 w - - 0 1").unwrap();
        play(&mut game, "a1d1");
        assert_eq!(game.history()[0].disambiguation, Some(Disambiguation::File('a')));
        assert_eq!(game.history()[0].san(), "Rad1");

        let mut game = Game::from_fen("4k3/8/8/R7/8/8/8/R3K3 w - - 0 1").unwrap();
        play(&mut game, "a1a3");
        assert_eq!(game.history()[0].disambiguation, Some(Disambiguation::Rank('1')));
        assert_eq!(game.history()[0].san(), "R1a3");
    }

    #[test]
    fn disambiguation_by_square() {
        let mut game = Game::from_fen("4k3/8/8/8/8/Q1Q5/8/Q3K3 w - - 0 1").unwrap();
        play(&mut game, "a3b2");
        assert_eq!(game.history()[0].disambiguation, Some(Disambiguation::Square(sq("a3"))));
        assert_eq!(game.history()[0].san(), "Qa3b2");
    }

    #[test]
    fn knight_disambiguation() {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/3P4/1N3NK1 w - - 0 1").unwrap();
        play(&mut game, "b1c3");
        assert_eq!(game.history()[0].disambiguation, None);
        let mut game = Game::from_fen("4k3/8/8/8/8/8/8/1N3NK1 w - - 0 1").unwrap();
        play(&mut game, "b1d2");
        assert_eq!(game.history()[0].disambiguation, Some(Disambiguation::File('b')));
    }

    #[test]
    fn resignation() {
        let mut game = Game::new();
        let events = record_events(&mut game);
        play(&mut game, "e2e4");
        game.resign(Color::Black).unwrap();
        assert_eq!(game.status(), GameStatus::Resigned { winner: Color::White });
        assert_eq!(game.history()[0].winner, Some(Color::White));
        assert_eq!(events.borrow().last(), Some(&Event::Resigned(Color::White)));
        assert_eq!(game.resign(Color::White), Err(MoveError::GameOver));
    }

    #[test]
    fn apply_all_emits_for_last_only() {
        let mut game = Game::new();
        let events = record_events(&mut game);
        let proposals: Vec<Proposal> = ["e2e4", "e7e5", "g1f3"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        let outcomes = game.apply_all(proposals).unwrap();
        assert_eq!(outcomes.len(), 3);
        assert_eq!(game.move_count(), 3);
        assert_eq!(events.borrow().len(), 2);
        assert!(!game.signals().is_blocked());
    }

    #[test]
    fn blocking_survives_a_panicking_closure() {
        let mut game = Game::new();
        let events = record_events(&mut game);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            game.with_signals_blocked(|game| {
                game.apply_str("e2e4").unwrap();
                assert!(game.signals().is_blocked());
                panic!("observer failed");
            })
        }));
        assert!(result.is_err());
        assert!(!game.signals().is_blocked());
        assert!(events.borrow().is_empty());

        game.apply_str("e7e5").unwrap();
        assert!(!events.borrow().is_empty());
    }

    #[test]
    fn apply_all_stops_at_first_rejection() {
        let mut game = Game::new();
        let proposals = [(sq("e2"), sq("e4")), (sq("e2"), sq("e3")), (sq("e7"), sq("e5"))];
        assert_eq!(
            game.apply_all(proposals),
            Err(MoveError::EmptySource(sq("e2")))
        );
        assert_eq!(game.move_count(), 1);
        assert!(!game.signals().is_blocked());
    }

    #[test]
    fn reset_restores_start() {
        let mut game = Game::new();
        play(&mut game, "e2e4 e7e5 g1f3");
        game.reset();
        assert_eq!(game.board(), &Board::new());
        assert_eq!(game.current_player(), Color::White);
        assert!(game.history().is_empty());
        assert_eq!(game.castling_rights(), CastlingRights::ALL);
    }

    #[test]
    fn reset_board_to_chess960_emits_event() {
        let mut game = Game::new();
        let events = record_events(&mut game);
        game.reset_board(false);
        assert!(!game.is_standard());
        assert_eq!(game.board().len(), 32);
        assert_eq!(*events.borrow(), vec![Event::NonStandardBoardSet]);
        game.reset_board(true);
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn config_sets_defaults() {
        let config = GameConfig::from_toml_str("[promotion]\nblack = \"rook\"").unwrap();
        let game = Game::with_config(&config);
        assert_eq!(game.default_promotion(Color::Black), Some(PieceKind::Rook));
        assert_eq!(game.default_promotion(Color::White), None);
        assert!(game.is_standard());
    }

    #[test]
    fn from_fen_detects_finished_positions() {
        let game = Game::from_fen("3R2k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        assert_eq!(game.status(), GameStatus::Checkmate { winner: Color::White });
        let game = Game::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(game.status(), GameStatus::Stalemate);
    }
}
