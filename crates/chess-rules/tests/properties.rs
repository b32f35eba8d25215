//! Invariants that must hold along random games.

use chess_rules::pgn::encode_moves;
use chess_rules::rules::{self, in_check};
use chess_rules::{parse_pgn, Color, Game, GameStatus, MoveError, MoveOracle, PgnGame, PieceKind, Proposal};
use proptest::prelude::*;

/// Starting positions with an en passant target or partial castling rights.
const STARTS: [&str; 4] = [
    "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
    "r3k2r/pppp1ppp/8/8/3pP3/8/PPP2PPP/R3K2R b Kq e3 0 1",
    "r3k2r/8/8/8/8/8/8/R3K2R w Qk - 0 1",
    "4k3/2p5/8/1P6/8/8/8/4K3 b - - 0 1",
];

/// Plays one legal move per choice until the choices run out or the game
/// ends, calling `after_move` after every accepted move.
fn random_walk(choices: &[u32], after_move: impl FnMut(&mut Game)) -> Game {
    walk_from(Game::new(), choices, after_move)
}

fn walk_from(mut game: Game, choices: &[u32], mut after_move: impl FnMut(&mut Game)) -> Game {
    for &choice in choices {
        if game.is_over() {
            break;
        }
        let moves = game.legal_moves();
        assert!(!moves.is_empty(), "ongoing game without a legal move");
        let (src, dst) = moves[choice as usize % moves.len()];

        let mut proposal = Proposal::new(src, dst);
        let mover = game.board().get(src).unwrap();
        if mover.is_pawn() && dst.y() == mover.color.promotion_rank() {
            let kind = PieceKind::PROMOTIONS[(choice / 7) as usize % PieceKind::PROMOTIONS.len()];
            proposal = proposal.with_promotion(kind);
        }

        let outcome = game.apply(proposal).unwrap_or_else(|e| panic!("{} rejected: {}", proposal, e));
        assert!(outcome.played().is_some());
        after_move(&mut game);
    }
    game
}

fn choices() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(any::<u32>(), 0..80)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn board_views_agree_and_captures_are_off_board(choices in choices()) {
        random_walk(&choices, |game| {
            let board = game.board();
            for (sq, piece) in board.pieces() {
                assert_eq!(board.square_of(piece), sq);
                assert_eq!(board.get(sq), Some(piece));
            }
            assert_eq!(board.pieces().count(), board.len());
            for color in Color::ALL {
                for lost in game.captured(color) {
                    assert_eq!(lost.color, color);
                    assert!(!board.contains(*lost));
                }
            }
        });
    }

    #[test]
    fn accepted_moves_keep_the_king_safe(choices in choices()) {
        random_walk(&choices, |game| {
            let mover = game.history().last().unwrap().color();
            assert!(!in_check(game.board(), mover));
        });
    }

    #[test]
    fn self_check_rejections_really_expose_the_king(choices in choices()) {
        random_walk(&choices, |game| {
            if game.is_over() {
                return;
            }
            let color = game.current_player();
            let legal = game.legal_moves();
            let board = game.board().clone();
            for (src, _) in board.pieces_of(color) {
                for (dst, _) in board.move_hints(src) {
                    if !MoveOracle::new().is_legal(&board, src, dst) || legal.contains(&(src, dst)) {
                        continue;
                    }
                    let mut trial = board.clone();
                    trial.make(src, dst, None);
                    assert!(in_check(&trial, color), "{}{} rejected but safe", src, dst);
                    assert!(matches!(
                        game.apply(Proposal::new(src, dst)),
                        Err(MoveError::LeavesKingInCheck(_))
                    ));
                }
            }
        });
    }

    #[test]
    fn two_square_marker_only_after_double_push(choices in choices()) {
        random_walk(&choices, |game| {
            let last = game.history().last().unwrap();
            let double_push = last.piece.is_pawn() && last.src.delta(last.dst).1.abs() == 2;
            if double_push {
                assert_eq!(game.board().pawn_two_square_dst(), Some(last.dst));
            } else {
                assert_eq!(game.board().pawn_two_square_dst(), None);
            }
        });
    }

    #[test]
    fn replay_matches_live_board(choices in choices()) {
        random_walk(&choices, |game| {
            let mut player = game.history_player();
            assert_eq!(&player.current().board, game.board());
            let before_last = player.step_back();
            assert_eq!(before_last.played.is_some(), game.move_count() > 1);
        });
    }

    #[test]
    fn mate_agrees_with_move_generation(choices in choices()) {
        random_walk(&choices, |game| {
            let defender = game.history().last().unwrap().color().opposite();
            let mut board = game.board().clone();
            let no_moves = rules::legal_moves(&mut board, game.castling_rights(), defender).is_empty();
            let checked = in_check(&board, defender);
            assert_eq!(rules::is_checkmate(&mut board, defender), checked && no_moves);
            assert_eq!(
                matches!(game.status(), GameStatus::Checkmate { .. }),
                checked && no_moves
            );
            assert_eq!(game.status() == GameStatus::Stalemate, !checked && no_moves);
        });
    }

    #[test]
    fn pgn_round_trip(choices in choices()) {
        let game = random_walk(&choices, |_| {});
        let pgn = PgnGame::from_game(&game);
        let text = pgn.to_pgn();
        let decoded = parse_pgn(&text).unwrap_or_else(|e| panic!("{}\n{}", e, text));
        prop_assert_eq!(decoded.len(), 1);
        prop_assert_eq!(decoded[0].moves.as_slice(), game.history());
        prop_assert_eq!(
            encode_moves(&decoded[0].moves, Color::White),
            encode_moves(game.history(), Color::White)
        );
        prop_assert_eq!(&decoded[0].final_board(), game.board());
    }

    #[test]
    fn pgn_round_trip_from_positions(start in 0..STARTS.len(), choices in choices()) {
        let game = walk_from(Game::from_fen(STARTS[start]).unwrap(), &choices, |_| {});
        let text = PgnGame::from_game(&game).to_pgn();
        let decoded = parse_pgn(&text).unwrap_or_else(|e| panic!("{}\n{}", e, text)).remove(0);
        prop_assert_eq!(&decoded.initial, game.initial_board());
        prop_assert_eq!(decoded.initial_player, game.initial_player());
        prop_assert_eq!(decoded.initial_rights, game.initial_castling_rights());
        prop_assert_eq!(decoded.moves.as_slice(), game.history());
        prop_assert_eq!(&decoded.final_board(), game.board());
    }
}
