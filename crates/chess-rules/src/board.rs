//! Board representation.
//!
//! The board keeps two views that always agree: what stands on each of the
//! 64 squares, and where each placed piece stands. It also remembers the
//! destination of the last two-square pawn advance, which is all the state
//! en passant needs.

use crate::oracle;
use crate::rules::CastlingRights;
use chess_core::{format_placement, Color, Fen, FenError, Piece, PieceKind, Square};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;
use std::fmt;

const STANDARD_BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// The pieces on the board and where they stand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; 64],
    locations: HashMap<Piece, Square>,
    pawn_two_square_dst: Option<Square>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Creates a board in the standard starting position.
    pub fn new() -> Self {
        let mut board = Board::empty();
        board.set_back_ranks(STANDARD_BACK_RANK);
        board
    }

    /// Creates a board with no pieces.
    pub fn empty() -> Self {
        Board {
            squares: [None; 64],
            locations: HashMap::new(),
            pawn_two_square_dst: None,
        }
    }

    /// Creates a Chess960 board using the thread-local random generator.
    pub fn chess960() -> Self {
        Self::chess960_with(&mut rand::thread_rng())
    }

    /// Creates a Chess960 board drawing from `rng`.
    pub fn chess960_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut board = Board::empty();
        board.set_back_ranks(random_back_rank(rng));
        board
    }

    /// Builds a board from a FEN record.
    ///
    /// Ordinals are handed out per kind and color in square order, a-file first.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Self::from_parsed_fen(&Fen::parse(fen)?)
    }

    pub(crate) fn from_parsed_fen(fen: &Fen) -> Result<Self, FenError> {
        let mut placement = fen.placement.clone();
        placement.sort_by_key(|(sq, _, _)| *sq);

        let mut board = Board::empty();
        let mut next = HashMap::<(PieceKind, Color), u8>::new();
        for (sq, kind, color) in placement {
            let ordinal = next.entry((kind, color)).or_insert(0);
            if kind == PieceKind::King && *ordinal > 0 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "more than one {} king",
                    color
                )));
            }
            board.place(Piece::new(kind, color, *ordinal), sq);
            *ordinal += 1;
        }

        // FEN names the skipped square; the pawn itself stands one rank further on.
        if let Some(target) = fen.en_passant {
            let dy = if target.y() == 2 { 1 } else { -1 };
            board.pawn_two_square_dst = target
                .offset(0, dy)
                .filter(|sq| board.get(*sq).is_some_and(|p| p.is_pawn()));
        }
        Ok(board)
    }

    /// Renders the placement field of a FEN record.
    pub fn to_fen_placement(&self) -> String {
        format_placement(|sq| self.get(sq).map(Piece::fen_char))
    }

    /// Renders a full FEN record with zeroed move clocks.
    pub fn to_fen(&self, side_to_move: Color, rights: CastlingRights) -> String {
        let en_passant = self
            .en_passant_target()
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());
        format!(
            "{} {} {} {} 0 1",
            self.to_fen_placement(),
            side_to_move.fen_char(),
            rights.to_fen_letters(),
            en_passant
        )
    }

    /// The square a pawn skipped on the last move, as FEN names it.
    pub fn en_passant_target(&self) -> Option<Square> {
        let dst = self.pawn_two_square_dst?;
        let pawn = self.get(dst)?;
        dst.offset(0, -pawn.color.forward())
    }

    /// Resets to the standard position, or to a random Chess960 position.
    pub fn reset(&mut self, standard: bool) {
        *self = if standard {
            Board::new()
        } else {
            Board::chess960()
        };
    }

    fn set_back_ranks(&mut self, back_rank: [PieceKind; 8]) {
        for color in Color::ALL {
            let mut next = HashMap::<PieceKind, u8>::new();
            for (x, kind) in back_rank.iter().enumerate() {
                let ordinal = next.entry(*kind).or_insert(0);
                let sq = square(x as u8, color.back_rank());
                self.place(Piece::new(*kind, color, *ordinal), sq);
                *ordinal += 1;
            }
            for x in 0..8u8 {
                let sq = square(x, color.pawn_rank());
                self.place(Piece::new(PieceKind::Pawn, color, x), sq);
            }
        }
    }

    /// Returns the piece standing on `sq`.
    #[inline]
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()]
    }

    /// Returns the square of `piece`.
    ///
    /// # Panics
    ///
    /// Panics if the piece is not on the board.
    pub fn square_of(&self, piece: Piece) -> Square {
        match self.locations.get(&piece) {
            Some(sq) => *sq,
            None => panic!("{} is not on the board", piece),
        }
    }

    /// Returns the square of `piece`, if it is on the board.
    #[inline]
    pub fn find(&self, piece: Piece) -> Option<Square> {
        self.locations.get(&piece).copied()
    }

    #[inline]
    pub fn contains(&self, piece: Piece) -> bool {
        self.locations.contains_key(&piece)
    }

    /// Returns where the king of `color` stands.
    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.find(Piece::king(color))
    }

    /// Iterates over occupied squares, a1 to h8 rank by rank.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.get(sq).map(|p| (sq, p)))
    }

    /// Occupied squares holding pieces of `color`.
    pub fn pieces_of(&self, color: Color) -> Vec<(Square, Piece)> {
        self.pieces().filter(|(_, p)| p.color == color).collect()
    }

    /// Number of pieces on the board.
    #[inline]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Destination of the pawn that advanced two squares on the last move.
    #[inline]
    pub fn pawn_two_square_dst(&self) -> Option<Square> {
        self.pawn_two_square_dst
    }

    pub(crate) fn set_pawn_two_square_dst(&mut self, sq: Option<Square>) {
        self.pawn_two_square_dst = sq;
    }

    /// Ordinal for a new piece of `kind` and `color`: one past the highest on the board.
    pub fn next_ordinal(&self, kind: PieceKind, color: Color) -> u8 {
        self.locations
            .keys()
            .filter(|p| p.kind == kind && p.color == color)
            .map(|p| p.ordinal + 1)
            .max()
            .unwrap_or(0)
    }

    /// Puts `piece` on the empty square `sq`.
    ///
    /// # Panics
    ///
    /// Panics if `sq` is occupied, if `piece` is already on the board, or if
    /// a second king of the same color would appear.
    pub fn place(&mut self, piece: Piece, sq: Square) {
        if let Some(occupant) = self.get(sq) {
            panic!("cannot place {} on {}: occupied by {}", piece, sq, occupant);
        }
        if let Some(at) = self.find(piece) {
            panic!("cannot place {} on {}: already on {}", piece, sq, at);
        }
        if piece.is_king() {
            if let Some((at, _)) = self
                .locations
                .iter()
                .find(|(p, _)| p.is_king() && p.color == piece.color)
            {
                panic!("cannot place {} on {}: {} king already on {}", piece, sq, piece.color, at);
            }
        }
        self.squares[sq.index()] = Some(piece);
        self.locations.insert(piece, sq);
    }

    /// Removes and returns whatever stands on `sq`.
    pub fn clear(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.squares[sq.index()].take()?;
        self.locations.remove(&piece);
        Some(piece)
    }

    /// Moves the occupant of `src` to `dst`, returning the captured piece.
    ///
    /// An en passant capture removes the passed pawn from its own square.
    /// The two-square marker is set when a pawn advances two ranks and
    /// cleared by any other move.
    ///
    /// # Panics
    ///
    /// Panics if `src` is empty.
    pub fn move_piece(&mut self, src: Square, dst: Square) -> Option<Piece> {
        let mover = match self.get(src) {
            Some(piece) => piece,
            None => panic!("cannot move from {}: square is empty", src),
        };
        let victim_sq = oracle::en_passant_victim(self, mover, src, dst).unwrap_or(dst);
        let captured = self.clear(victim_sq);
        self.clear(src);
        self.place(mover, dst);

        let (_, dy) = src.delta(dst);
        self.pawn_two_square_dst = if mover.is_pawn() && dy.abs() == 2 {
            Some(dst)
        } else {
            None
        };
        captured
    }

    /// Replaces whatever stands on `dst` with `new_piece`.
    pub fn promote(&mut self, new_piece: Piece, dst: Square) {
        self.clear(dst);
        self.place(new_piece, dst);
    }

    /// Castles for `color`, rook first, then king.
    ///
    /// Returns the king's source and destination. The caller has already
    /// checked that castling is allowed.
    pub fn castle(&mut self, color: Color, king_side: bool) -> (Square, Square) {
        let squares = CastleSquares::new(color, king_side);
        self.move_piece(squares.rook_src, squares.rook_dst);
        let king_src = self.square_of(Piece::king(color));
        self.move_piece(king_src, squares.king_dst);
        (king_src, squares.king_dst)
    }

    /// Destinations the occupant of `sq` could reach as a lone mover.
    ///
    /// Each ray stops at the first occupied square, which is included when it
    /// holds an enemy the piece could take. Pawns never take straight ahead
    /// and never step diagonally onto an empty square, except en passant.
    pub fn move_hints(&self, sq: Square) -> Vec<(Square, Option<Piece>)> {
        let Some(mover) = self.get(sq) else {
            return Vec::new();
        };
        let mut hints = Vec::new();
        for ray in mover.rays() {
            let straight = ray.dx == 0;
            for dst in ray.walk(sq) {
                match self.get(dst) {
                    None if mover.is_pawn() && !straight => {
                        if let Some(victim_sq) = oracle::en_passant_victim(self, mover, sq, dst) {
                            hints.push((dst, self.get(victim_sq)));
                        }
                    }
                    None => hints.push((dst, None)),
                    Some(occupant) => {
                        let pawn_push = mover.is_pawn() && straight;
                        if occupant.color != mover.color && !pawn_push {
                            hints.push((dst, Some(occupant)));
                        }
                        break;
                    }
                }
            }
        }
        if mover.is_pawn() && sq.y() == mover.color.pawn_rank() {
            let forward = mover.color.forward();
            let step = sq.offset(0, forward);
            let jump = sq.offset(0, 2 * forward);
            if let (Some(step), Some(jump)) = (step, jump) {
                if self.get(step).is_none() && self.get(jump).is_none() {
                    hints.push((jump, None));
                }
            }
        }
        hints
    }
}

#[inline]
pub(crate) fn square(x: u8, y: u8) -> Square {
    Square::new(x as i32, y as i32).expect("coordinates within 0..8")
}

/// Squares touched by a castling move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CastleSquares {
    pub king_src: Square,
    pub king_dst: Square,
    pub rook_src: Square,
    pub rook_dst: Square,
}

impl CastleSquares {
    pub fn new(color: Color, king_side: bool) -> Self {
        let y = color.back_rank();
        let (rook_x, rook_dst_x, king_dst_x) = if king_side { (7, 5, 6) } else { (0, 3, 2) };
        CastleSquares {
            king_src: square(4, y),
            king_dst: square(king_dst_x, y),
            rook_src: square(rook_x, y),
            rook_dst: square(rook_dst_x, y),
        }
    }
}

/// Random Chess960 back rank: king off the edge, a rook on either side of
/// it, bishops on opposite colors, queen and knights in the remaining files.
fn random_back_rank<R: Rng + ?Sized>(rng: &mut R) -> [PieceKind; 8] {
    let mut rank: [Option<PieceKind>; 8] = [None; 8];

    let king = rng.gen_range(1..7);
    rank[king] = Some(PieceKind::King);
    rank[rng.gen_range(0..king)] = Some(PieceKind::Rook);
    rank[rng.gen_range(king + 1..8)] = Some(PieceKind::Rook);

    for parity in [0, 1] {
        let free: Vec<usize> = (0..8)
            .filter(|x| rank[*x].is_none() && x % 2 == parity)
            .collect();
        if let Some(x) = free.choose(rng) {
            rank[*x] = Some(PieceKind::Bishop);
        }
    }

    let mut rest = [PieceKind::Queen, PieceKind::Knight, PieceKind::Knight];
    rest.shuffle(rng);
    let mut rest = rest.into_iter();
    for slot in rank.iter_mut().filter(|slot| slot.is_none()) {
        *slot = rest.next();
    }

    rank.map(|slot| slot.unwrap_or(PieceKind::Knight))
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..8u8).rev() {
            write!(f, "{} ", y + 1)?;
            for x in 0..8u8 {
                let c = self.get(square(x, y)).map_or('.', Piece::fen_char);
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}
