//! Observer hooks for game events.
//!
//! Each event kind has its own [`Signal`] holding boxed callbacks, plus a
//! catch-all signal that sees every [`Event`]. Callbacks run synchronously,
//! in connection order, from inside the call that caused the event.

use crate::capturables::Capturables;
use crate::played_move::PlayedMove;
use chess_core::{Color, Piece, Proposal, Square};
use std::fmt;

/// State of the game right after a move was accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveSnapshot {
    pub src: Square,
    pub dst: Square,
    /// White pieces lost so far.
    pub captured_white: Vec<Piece>,
    /// Black pieces lost so far.
    pub captured_black: Vec<Piece>,
    /// The side ahead in captured material, if either.
    pub leader: Option<Color>,
    /// Material difference in points.
    pub lead: u32,
    pub move_history: Vec<PlayedMove>,
    pub capturables: Capturables,
}

/// Everything a game can announce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    MoveAccepted(Box<MoveSnapshot>),
    InvalidMove,
    /// A pawn reached the last rank without a promotion choice; carries the
    /// proposal that must be resent with one.
    PromotionRequired(Proposal),
    PlayerChanged(Color),
    /// Carries the winner.
    Mate(Color),
    Stalemate,
    /// Carries the winner.
    Resigned(Color),
    NonStandardBoardSet,
}

/// A list of callbacks for one kind of payload.
pub struct Signal<T> {
    slots: Vec<Box<dyn FnMut(&T)>>,
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Signal { slots: Vec::new() }
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("slots", &self.slots.len())
            .finish()
    }
}

impl<T> Signal<T> {
    /// Adds a callback.
    pub fn connect(&mut self, slot: impl FnMut(&T) + 'static) {
        self.slots.push(Box::new(slot));
    }

    pub fn disconnect_all(&mut self) {
        self.slots.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn emit(&mut self, value: &T) {
        for slot in &mut self.slots {
            slot(value);
        }
    }
}

/// All signals a [`Game`](crate::Game) emits.
#[derive(Debug, Default)]
pub struct GameSignals {
    pub move_accepted: Signal<MoveSnapshot>,
    pub invalid_move: Signal<()>,
    pub promotion_required: Signal<Proposal>,
    pub player_changed: Signal<Color>,
    pub mate: Signal<Color>,
    pub stalemate: Signal<()>,
    pub resigned: Signal<Color>,
    pub non_standard_board_set: Signal<()>,
    /// Sees every event after its dedicated signal.
    pub any: Signal<Event>,
    blocked: bool,
}

impl GameSignals {
    /// Returns true while events are being dropped.
    #[inline]
    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Drops or resumes events, returning the previous setting.
    pub fn set_blocked(&mut self, blocked: bool) -> bool {
        std::mem::replace(&mut self.blocked, blocked)
    }

    /// Removes every connected callback.
    pub fn disconnect_all(&mut self) {
        self.move_accepted.disconnect_all();
        self.invalid_move.disconnect_all();
        self.promotion_required.disconnect_all();
        self.player_changed.disconnect_all();
        self.mate.disconnect_all();
        self.stalemate.disconnect_all();
        self.resigned.disconnect_all();
        self.non_standard_board_set.disconnect_all();
        self.any.disconnect_all();
    }

    /// Routes `event` to its signal, then to [`GameSignals::any`].
    pub fn dispatch(&mut self, event: Event) {
        if self.blocked {
            return;
        }
        match &event {
            Event::MoveAccepted(snapshot) => self.move_accepted.emit(snapshot),
            Event::InvalidMove => self.invalid_move.emit(&()),
            Event::PromotionRequired(proposal) => self.promotion_required.emit(proposal),
            Event::PlayerChanged(color) => self.player_changed.emit(color),
            Event::Mate(winner) => self.mate.emit(winner),
            Event::Stalemate => self.stalemate.emit(&()),
            Event::Resigned(winner) => self.resigned.emit(winner),
            Event::NonStandardBoardSet => self.non_standard_board_set.emit(&()),
        }
        self.any.emit(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn dispatch_reaches_dedicated_and_catch_all() {
        let mut signals = GameSignals::default();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let log = Rc::clone(&seen);
        signals
            .player_changed
            .connect(move |color| log.borrow_mut().push(format!("player {}", color)));
        let log = Rc::clone(&seen);
        signals
            .any
            .connect(move |event| log.borrow_mut().push(format!("{:?}", event)));

        signals.dispatch(Event::PlayerChanged(Color::Black));
        signals.dispatch(Event::Stalemate);

        assert_eq!(
            *seen.borrow(),
            vec![
                "player Black".to_string(),
                "PlayerChanged(Black)".to_string(),
                "Stalemate".to_string(),
            ]
        );
    }

    #[test]
    fn blocked_signals_drop_events() {
        let mut signals = GameSignals::default();
        let count = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&count);
        signals.invalid_move.connect(move |_| *counter.borrow_mut() += 1);

        assert!(!signals.set_blocked(true));
        signals.dispatch(Event::InvalidMove);
        assert!(signals.set_blocked(false));
        signals.dispatch(Event::InvalidMove);

        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn disconnect_all_empties_every_signal() {
        let mut signals = GameSignals::default();
        signals.mate.connect(|_| {});
        signals.any.connect(|_| {});
        assert_eq!(signals.mate.len(), 1);
        signals.disconnect_all();
        assert!(signals.mate.is_empty());
        assert!(signals.any.is_empty());
    }
}
