//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.

use super::generate_legal_moves;
use crate::{Board, Position};
use std::thread;

/// Counts the leaf nodes at `depth` by making and undoing moves in place.
///
/// `position` is returned to its original state.
pub fn perft(position: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    if depth == 1 {
        return position.legal_moves().len() as u64;
    }

    let moves = position.legal_moves().clone();
    let mut nodes = 0u64;
    for m in &moves {
        position.make_move(*m);
        nodes += perft(position, depth - 1);
        position.undo_move();
    }
    nodes
}

/// Counts leaf nodes by copying the board at every ply instead of undoing.
pub fn perft_copy(board: &Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_legal_moves(board);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for m in &moves {
        let mut child = *board;
        child.make_move(*m);
        nodes += perft_copy(&child, depth - 1);
    }
    nodes
}

/// Perft with divide - node count below each root move, sorted by UCI text.
/// Useful for debugging to identify which moves have incorrect counts.
pub fn perft_divide(position: &mut Position, depth: u32) -> Vec<(String, u64)> {
    let moves = position.legal_moves().clone();
    let mut results = Vec::with_capacity(moves.len());

    for m in &moves {
        position.make_move(*m);
        let nodes = if depth > 1 {
            perft(position, depth - 1)
        } else {
            1
        };
        position.undo_move();
        tracing::trace!(mv = %m, nodes, "divide");
        results.push((m.to_uci(), nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}

/// Perft with the root moves split across `threads` scoped threads.
///
/// Every thread works on its own clone of `position`.
pub fn perft_parallel(position: &Position, depth: u32, threads: usize) -> u64 {
    let moves = position.legal_moves().clone();
    if depth <= 1 || threads <= 1 || moves.len() <= 1 {
        return perft(&mut position.clone(), depth);
    }

    let chunk = moves.len().div_ceil(threads);
    thread::scope(|scope| {
        let handles: Vec<_> = moves
            .as_slice()
            .chunks(chunk)
            .map(|roots| {
                let mut local = position.clone();
                scope.spawn(move || {
                    let mut nodes = 0u64;
                    for m in roots {
                        local.make_move(*m);
                        nodes += perft(&mut local, depth - 1);
                        local.undo_move();
                    }
                    nodes
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
            .sum()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
    const POSITION_4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
    const POSITION_5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 0 1";

    fn check(fen: &str, expected: &[u64]) {
        let mut position = Position::from_fen(fen).unwrap();
        for (depth, &nodes) in (1..).zip(expected) {
            assert_eq!(perft(&mut position, depth), nodes, "{} depth {}", fen, depth);
        }
        assert_eq!(position.to_fen(), Position::from_fen(fen).unwrap().to_fen());
        assert_eq!(position.ply_count(), 0);
    }

    #[test]
    fn perft_startpos() {
        check(chess_core::STARTPOS_FEN, &[20, 400, 8902, 197281]);
    }

    // Kiwipete - a position with lots of special moves
    #[test]
    fn perft_kiwipete() {
        check(KIWIPETE, &[48, 2039, 97862]);
    }

    // Position 3: Check evasion, en passant, promotion
    #[test]
    fn perft_position3() {
        check(POSITION_3, &[14, 191, 2812]);
    }

    // Position 4: Lots of promotions and captures
    #[test]
    fn perft_position4() {
        check(POSITION_4, &[6, 264, 9467]);
    }

    // Position 5: Complex position
    #[test]
    fn perft_position5() {
        check(POSITION_5, &[44, 1486, 62379]);
    }

    #[test]
    fn copy_make_agrees_with_undo() {
        for fen in [chess_core::STARTPOS_FEN, KIWIPETE, POSITION_4] {
            let board = Board::from_fen(fen).unwrap();
            let mut position = Position::from_fen(fen).unwrap();
            assert_eq!(perft_copy(&board, 3), perft(&mut position, 3), "{}", fen);
        }
    }

    #[test]
    fn parallel_agrees_with_serial() {
        let position = Position::from_fen(KIWIPETE).unwrap();
        assert_eq!(perft_parallel(&position, 3, 4), 97862);
        assert_eq!(perft_parallel(&position, 2, 1), 2039);
        assert_eq!(perft_parallel(&position, 1, 8), 48);
    }

    #[test]
    fn perft_divide_works() {
        let mut position = Position::startpos();
        let results = perft_divide(&mut position, 2);
        assert_eq!(results.len(), 20);
        assert_eq!(results[0].0, "a2a3");
        assert!(results.iter().all(|(_, n)| *n == 20));
        let total: u64 = results.iter().map(|(_, n)| n).sum();
        assert_eq!(total, 400);
    }
}
