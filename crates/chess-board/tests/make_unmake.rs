//! Property tests for reversible move application.
//!
//! Random legal playouts from a handful of tactical positions: every make
//! is undone and compared, and the incremental hash is checked against a
//! full recompute at each ply.

use chess_board::{generate_legal_moves, Board, Position};
use proptest::prelude::*;

const FENS: [&str; 5] = [
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 0 1",
];

proptest! {
    #[test]
    fn board_make_unmake_round_trips(
        start in 0..FENS.len(),
        choices in prop::collection::vec(any::<u16>(), 0..60),
    ) {
        let mut board = Board::from_fen(FENS[start]).unwrap();
        for choice in choices {
            let moves = generate_legal_moves(&board);
            if moves.is_empty() {
                break;
            }
            let m = moves[choice as usize % moves.len()];

            let before = board;
            let undo = board.make_move(m);
            prop_assert_eq!(board.hash(), board.compute_hash(), "hash drift after {}", m);
            prop_assert_eq!(Board::from_state(&board.to_state()).unwrap(), board);

            board.unmake_move(m, &undo);
            prop_assert_eq!(board, before, "unmake of {} did not restore", m);

            board.make_move(m);
        }
    }

    #[test]
    fn position_undo_restores_start(
        start in 0..FENS.len(),
        choices in prop::collection::vec(any::<u16>(), 0..40),
    ) {
        let mut position = Position::from_fen(FENS[start]).unwrap();
        let initial_state = position.to_state();
        let initial_hash = position.hash();
        let initial_moves = position.legal_moves().clone();

        let mut played = 0;
        for choice in choices {
            let moves = position.legal_moves();
            if moves.is_empty() {
                break;
            }
            let m = moves[choice as usize % moves.len()];
            position.make_move(m);
            played += 1;
        }
        prop_assert_eq!(position.ply_count(), played);

        while position.undo_move().is_some() {}
        prop_assert_eq!(position.to_state(), initial_state);
        prop_assert_eq!(position.hash(), initial_hash);
        prop_assert_eq!(position.occurrences(), 1);
        prop_assert_eq!(position.legal_moves().as_slice(), initial_moves.as_slice());
    }
}

#[test]
fn every_special_move_round_trips() {
    // Castling both ways for both colors, en passant, and all promotion kinds.
    let cases = [
        ("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", ["e1g1", "e1c1"]),
        ("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1", ["e8g8", "e8c8"]),
        ("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1", ["e5d6", "e5e6"]),
        ("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1", ["a7a8q", "a7b8n"]),
        ("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1", ["a7a8r", "a7b8b"]),
        ("4k3/8/8/8/8/8/6p1/4K2R b K - 0 1", ["g2h1q", "g2g1r"]),
    ];
    for (fen, ucis) in cases {
        for uci in ucis {
            let mut position = Position::from_fen(fen).unwrap();
            let before = position.to_state();
            let hash = position.hash();
            let m = position.make_move_uci(uci).unwrap();
            assert_eq!(position.board().hash(), position.board().compute_hash(), "{}", uci);
            assert_eq!(position.undo_move(), Some(m));
            assert_eq!(position.to_state(), before, "{} from {}", uci, fen);
            assert_eq!(position.hash(), hash);
        }
    }
}
