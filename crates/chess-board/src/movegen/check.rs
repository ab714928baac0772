//! Attack and check detection.

use super::attacks::{attack_tables, bishop_attacks, king_attacks, knight_attacks, rook_attacks};
use crate::{Bitboard, Board};
use chess_core::{Color, Piece, Square};

/// Squares attacked diagonally by a set of `color` pawns.
#[inline]
pub fn pawn_attack_span(pawns: Bitboard, color: Color) -> Bitboard {
    match color {
        Color::White => pawns.north_east() | pawns.north_west(),
        Color::Black => pawns.south_east() | pawns.south_west(),
    }
}

/// Returns true if any piece of `by` attacks `sq`.
pub fn is_square_attacked(board: &Board, sq: Square, by: Color) -> bool {
    let candidates = attack_tables().attacks_to(sq) & board.occupancy(by);
    if candidates.is_empty() {
        return false;
    }

    let occupied = board.occupied();
    let queens = board.pieces(by, Piece::Queen);

    let orthogonal = (board.pieces(by, Piece::Rook) | queens) & candidates;
    if orthogonal.is_not_empty() && (rook_attacks(sq, occupied) & orthogonal).is_not_empty() {
        return true;
    }

    let diagonal = (board.pieces(by, Piece::Bishop) | queens) & candidates;
    if diagonal.is_not_empty() && (bishop_attacks(sq, occupied) & diagonal).is_not_empty() {
        return true;
    }

    if (knight_attacks(sq) & board.pieces(by, Piece::Knight)).is_not_empty() {
        return true;
    }

    let pawns = board.pieces(by, Piece::Pawn) & candidates;
    if pawn_attack_span(pawns, by).contains(sq) {
        return true;
    }

    (king_attacks(sq) & board.pieces(by, Piece::King)).is_not_empty()
}

/// Returns true if the king of `color` is attacked.
///
/// A board without a king of that color is never in check.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    match board.king_square(color) {
        Some(king) => is_square_attacked(board, king, color.opposite()),
        None => false,
    }
}
