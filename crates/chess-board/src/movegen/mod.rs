//! Move generation.
//!
//! Pseudo-legal moves come from [`generate_pseudo_legal`]; [`generate_legal_moves`]
//! filters them down to the moves that do not leave the mover in check.

mod attacks;
mod check;
mod legal;
pub mod perft;

use crate::{Bitboard, Board};
use chess_core::{Color, Move, Piece, Square};

pub use attacks::{
    attack_tables, bishop_attacks, king_attacks, knight_attacks, queen_attacks, rook_attacks,
    AttackTables, Direction,
};
pub use check::{is_in_check, is_square_attacked, pawn_attack_span};
pub use legal::{generate_legal_moves, is_legal};

/// A list of moves with a fixed maximum capacity.
///
/// Chess positions have at most 218 legal moves, so we use a fixed-size
/// array to avoid heap allocations during move generation.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Maximum number of moves in any chess position.
    pub const MAX_MOVES: usize = 256;

    /// Creates an empty move list.
    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    /// Adds a move to the list.
    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    /// Returns the number of moves.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a slice of the moves.
    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    #[inline]
    pub fn contains(&self, m: Move) -> bool {
        self.as_slice().contains(&m)
    }

    /// Clears the move list.
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Retains only moves for which the predicate returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        let mut write = 0;
        for read in 0..self.len {
            if f(&self.moves[read]) {
                self.moves[write] = self.moves[read];
                write += 1;
            }
        }
        self.len = write;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        debug_assert!(index < self.len);
        &self.moves[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Appends every pseudo-legal move for the side to move.
///
/// Moves may leave the mover's king in check, and castling is emitted
/// without testing the king's path for attacks.
pub fn generate_pseudo_legal(board: &Board, moves: &mut MoveList) {
    let us = board.side_to_move();
    let ours = board.occupancy(us);
    let occupied = board.occupied();

    generate_pawn_moves(board, moves);

    for from in board.pieces(us, Piece::Knight) {
        push_targets(board, from, knight_attacks(from) & !ours, moves);
    }

    let diagonal = board.pieces(us, Piece::Bishop) | board.pieces(us, Piece::Queen);
    for from in diagonal {
        push_targets(board, from, bishop_attacks(from, occupied) & !ours, moves);
    }

    let orthogonal = board.pieces(us, Piece::Rook) | board.pieces(us, Piece::Queen);
    for from in orthogonal {
        push_targets(board, from, rook_attacks(from, occupied) & !ours, moves);
    }

    if let Some(from) = board.king_square(us) {
        push_targets(board, from, king_attacks(from) & !ours, moves);
    }

    generate_castling_moves(board, moves);
}

#[inline]
fn push_targets(board: &Board, from: Square, targets: Bitboard, moves: &mut MoveList) {
    for to in targets {
        moves.push(Move::new(from, to, board.piece_at(to).map(|p| p.piece)));
    }
}

/// Pushes one move per promotion choice if `to` is on the last rank.
#[inline]
fn push_pawn_move(from: Square, to: Square, captured: Option<Piece>, moves: &mut MoveList) {
    if to.rank_index() == 0 || to.rank_index() == 7 {
        for promote_to in Piece::PROMOTIONS {
            moves.push(Move::with_promotion(from, to, captured, promote_to));
        }
    } else {
        moves.push(Move::new(from, to, captured));
    }
}

fn generate_pawn_moves(board: &Board, moves: &mut MoveList) {
    let us = board.side_to_move();
    let pawns = board.pieces(us, Piece::Pawn);
    let empty = !board.occupied();
    let push = us.pawn_push();

    let (single, double) = match us {
        Color::White => {
            let single = pawns.north() & empty;
            (single, (single & Bitboard::RANK_3).north() & empty)
        }
        Color::Black => {
            let single = pawns.south() & empty;
            (single, (single & Bitboard::RANK_6).south() & empty)
        }
    };

    for to in single {
        let from = Square::from_index_masked((to.index() as i8 - push) as u8);
        push_pawn_move(from, to, None, moves);
    }
    for to in double {
        let from = Square::from_index_masked((to.index() as i8 - 2 * push) as u8);
        moves.push(Move::quiet(from, to));
    }

    // The en passant square counts as an enemy-occupied target.
    let ep = board
        .en_passant()
        .map_or(Bitboard::EMPTY, Bitboard::from_square);
    let targets = board.occupancy(us.opposite()) | ep;

    let captures = match us {
        Color::White => [(pawns.north_west() & targets, 7i8), (pawns.north_east() & targets, 9)],
        Color::Black => [(pawns.south_west() & targets, -9i8), (pawns.south_east() & targets, -7)],
    };
    for (destinations, step) in captures {
        for to in destinations {
            let from = Square::from_index_masked((to.index() as i8 - step) as u8);
            if Some(to) == board.en_passant() {
                moves.push(Move::en_passant(from, to));
            } else {
                push_pawn_move(from, to, board.piece_at(to).map(|p| p.piece), moves);
            }
        }
    }
}

fn generate_castling_moves(board: &Board, moves: &mut MoveList) {
    let us = board.side_to_move();
    let rights = board.castling();
    let occupied = board.occupied();

    let (king_from, kingside_between, queenside_between) = match us {
        Color::White => (Square::E1, 0x0000_0000_0000_0060u64, 0x0000_0000_0000_000Eu64),
        Color::Black => (Square::E8, 0x6000_0000_0000_0000u64, 0x0E00_0000_0000_0000u64),
    };

    if rights.can_castle_kingside(us) && (occupied & Bitboard::new(kingside_between)).is_empty() {
        if let Some(to) = king_from.offset(0, 2) {
            moves.push(Move::castling(king_from, to));
        }
    }
    if rights.can_castle_queenside(us) && (occupied & Bitboard::new(queenside_between)).is_empty() {
        if let Some(to) = king_from.offset(0, -2) {
            moves.push(Move::castling(king_from, to));
        }
    }
}
