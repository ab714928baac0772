//! Legality filtering.

use super::check::is_in_check;
use super::{generate_pseudo_legal, MoveList};
use crate::Board;
use chess_core::Move;

/// Returns true if the pseudo-legal move `m` does not leave the mover in check.
///
/// Castling is also rejected when the king starts in check or crosses an
/// attacked square. The crossing is tested by playing a one-square king step
/// on a scratch copy.
pub fn is_legal(board: &Board, m: Move) -> bool {
    let us = board.side_to_move();

    if m.is_castling() {
        if is_in_check(board, us) {
            return false;
        }
        let step = if m.to() > m.from() { 1 } else { -1 };
        let Some(crossing) = m.from().offset(0, step) else {
            return false;
        };
        let mut scratch = *board;
        scratch.make_move(Move::quiet(m.from(), crossing));
        if is_in_check(&scratch, us) {
            return false;
        }
    }

    let mut scratch = *board;
    scratch.make_move(m);
    !is_in_check(&scratch, us)
}

/// Generates all legal moves for the side to move.
pub fn generate_legal_moves(board: &Board) -> MoveList {
    let mut moves = MoveList::new();
    generate_pseudo_legal(board, &mut moves);
    moves.retain(|m| is_legal(board, *m));
    moves
}
