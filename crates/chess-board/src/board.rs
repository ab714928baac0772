//! Piece placement and reversible move application.

use crate::movegen::is_in_check;
use crate::zobrist::ZOBRIST;
use crate::Bitboard;
use chess_core::{
    BoardState, CastlingRights, Color, ColoredPiece, FenError, Move, Piece, Square, StateError,
};
use std::fmt;

/// Everything make cannot reconstruct from the move alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoRecord {
    pub captured: Option<ColoredPiece>,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub hash: u64,
}

/// A chess board: placement, side to move, rights, clocks and hash.
///
/// Pieces are tracked twice, as per-color per-kind bitboards and as a
/// square-indexed array. Both are only ever changed through `set_square`,
/// which keeps them and the hash in agreement.
///
/// `Board` is `Copy` and owns no heap memory, so a scratch copy for a
/// legality test is a plain memcpy.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Board {
    /// [color][kind]; kind slot 0 is unused.
    pieces: [[Bitboard; 7]; 2],
    colors: [Bitboard; 2],
    occupied: Bitboard,
    squares: [Option<ColoredPiece>; 64],
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    hash: u64,
}

impl Board {
    fn empty() -> Self {
        Board {
            pieces: [[Bitboard::EMPTY; 7]; 2],
            colors: [Bitboard::EMPTY; 2],
            occupied: Bitboard::EMPTY,
            squares: [None; 64],
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
        }
    }

    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        Self::build(&BoardState::startpos())
    }

    /// Builds a board from structured state, rejecting anything unplayable.
    pub fn from_state(state: &BoardState) -> Result<Self, StateError> {
        state.validate()?;
        let board = Self::build(state);
        if is_in_check(&board, board.side_to_move.opposite()) {
            return Err(StateError::OpponentInCheck);
        }
        Ok(board)
    }

    /// Parses a FEN string into a board.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let state = BoardState::from_fen(fen)?;
        Ok(Self::from_state(&state)?)
    }

    fn build(state: &BoardState) -> Self {
        let mut board = Board::empty();
        for (index, piece) in state.placement.iter().enumerate().take(64) {
            if piece.is_some() {
                board.set_square(Square::from_index_masked(index as u8), *piece);
            }
        }
        board.side_to_move = state.side_to_move;
        board.castling = state.castling;
        board.en_passant = state.en_passant;
        board.halfmove_clock = state.halfmove_clock;
        board.fullmove_number = state.fullmove_number;
        board.hash = board.compute_hash();
        board
    }

    /// Exports the externally visible state.
    pub fn to_state(&self) -> BoardState {
        BoardState {
            placement: self.squares.to_vec(),
            side_to_move: self.side_to_move,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
    }

    pub fn to_fen(&self) -> String {
        self.to_state().to_fen()
    }

    /// Computes the hash from scratch.
    pub fn compute_hash(&self) -> u64 {
        let mut hash = 0;
        for (index, piece) in self.squares.iter().enumerate() {
            if let Some(piece) = piece {
                hash ^= ZOBRIST.piece(*piece, Square::from_index_masked(index as u8));
            }
        }
        hash ^ ZOBRIST.side(self.side_to_move)
            ^ ZOBRIST.castling(self.castling)
            ^ ZOBRIST.en_passant(self.en_passant)
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Returns a bitboard of all occupied squares.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    /// Returns every square holding a piece of `color`.
    #[inline]
    pub fn occupancy(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    /// Returns a bitboard of pieces of the given kind and color.
    #[inline]
    pub fn pieces(&self, color: Color, piece: Piece) -> Bitboard {
        self.pieces[color.index()][piece.index()]
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<ColoredPiece> {
        self.squares[sq.index() as usize]
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces(color, Piece::King).lsb()
    }

    /// Puts `piece` on `sq` (or empties it) and returns what was there.
    fn set_square(&mut self, sq: Square, piece: Option<ColoredPiece>) -> Option<ColoredPiece> {
        let bb = Bitboard::from_square(sq);
        let old = self.squares[sq.index() as usize];
        for p in [old, piece].into_iter().flatten() {
            self.pieces[p.color.index()][p.piece.index()] ^= bb;
            self.colors[p.color.index()] ^= bb;
            self.occupied ^= bb;
            self.hash ^= ZOBRIST.piece(p, sq);
        }
        self.squares[sq.index() as usize] = piece;
        old
    }

    /// Applies a pseudo-legal move and returns what is needed to take it back.
    ///
    /// A move whose source square is empty leaves the board untouched.
    pub fn make_move(&mut self, m: Move) -> UndoRecord {
        let mut undo = UndoRecord {
            captured: None,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            hash: self.hash,
        };

        let us = self.side_to_move;
        let from = m.from();
        let to = m.to();

        debug_assert!(self.piece_at(from).is_some(), "no piece on {} for {}", from, m);
        let Some(moving) = self.set_square(from, None) else {
            return undo;
        };

        undo.captured = if m.is_en_passant() {
            self.set_square(en_passant_victim(to, us), None)
        } else {
            self.set_square(to, None)
        };

        let placed = match m.promotion() {
            Some(promoted) => ColoredPiece::new(us, promoted),
            None => moving,
        };
        self.set_square(to, Some(placed));

        if m.is_castling() {
            let (rook_from, rook_to) = castling_rook_squares(to);
            let rook = self.set_square(rook_from, None);
            self.set_square(rook_to, rook);
        }

        self.hash ^= ZOBRIST.castling(self.castling);
        self.castling = self.castling.update_for_move(from, to);
        self.hash ^= ZOBRIST.castling(self.castling);

        self.hash ^= ZOBRIST.en_passant(self.en_passant);
        self.en_passant = if moving.piece == Piece::Pawn && from.index().abs_diff(to.index()) == 16 {
            Some(Square::from_index_masked((from.index() + to.index()) / 2))
        } else {
            None
        };
        self.hash ^= ZOBRIST.en_passant(self.en_passant);

        if moving.piece == Piece::Pawn || undo.captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if us == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }

        self.hash ^= ZOBRIST.side(us) ^ ZOBRIST.side(us.opposite());
        self.side_to_move = us.opposite();

        undo
    }

    /// Takes back `m`, which must be the last move made with `undo` its record.
    pub fn unmake_move(&mut self, m: Move, undo: &UndoRecord) {
        let us = self.side_to_move.opposite();
        let from = m.from();
        let to = m.to();

        if m.is_castling() {
            let (rook_from, rook_to) = castling_rook_squares(to);
            let rook = self.set_square(rook_to, None);
            self.set_square(rook_from, rook);
        }

        let placed = self.set_square(to, None);
        let moving = if m.is_promotion() {
            placed.map(|p| ColoredPiece::new(p.color, Piece::Pawn))
        } else {
            placed
        };
        self.set_square(from, moving);

        if let Some(captured) = undo.captured {
            let sq = if m.is_en_passant() {
                en_passant_victim(to, us)
            } else {
                to
            };
            self.set_square(sq, Some(captured));
        }

        if us == Color::Black {
            self.fullmove_number -= 1;
        }
        self.side_to_move = us;
        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.hash = undo.hash;
    }
}

/// The square of the pawn removed when `mover` captures en passant onto `to`.
#[inline]
fn en_passant_victim(to: Square, mover: Color) -> Square {
    Square::from_index_masked((to.index() as i8 - mover.pawn_push()) as u8)
}

/// Rook source and destination for a castling king landing on `king_to`.
#[inline]
fn castling_rook_squares(king_to: Square) -> (Square, Square) {
    match king_to {
        Square::G1 => (Square::H1, Square::F1),
        Square::C1 => (Square::A1, Square::D1),
        Square::G8 => (Square::H8, Square::F8),
        _ => (Square::A8, Square::D8),
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::startpos()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", self.to_fen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::STARTPOS_FEN;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn assert_consistent(board: &Board) {
        let mut occupied = Bitboard::EMPTY;
        for color in Color::ALL {
            let mut by_color = Bitboard::EMPTY;
            for piece in Piece::ALL {
                let bb = board.pieces(color, piece);
                for s in bb {
                    assert_eq!(board.piece_at(s), Some(ColoredPiece::new(color, piece)));
                }
                by_color |= bb;
            }
            assert_eq!(by_color, board.occupancy(color));
            occupied |= by_color;
        }
        assert_eq!(occupied, board.occupied());
        assert_eq!(board.squares.iter().filter(|p| p.is_some()).count() as u32, occupied.count());
        assert_eq!(board.hash(), board.compute_hash());
    }

    #[test]
    fn startpos_layout() {
        let board = Board::startpos();
        assert_eq!(board.to_fen(), STARTPOS_FEN);
        assert_eq!(board.occupied().count(), 32);
        assert_eq!(board.pieces(Color::White, Piece::Pawn).count(), 8);
        assert_eq!(board.king_square(Color::Black), Some(Square::E8));
        assert_consistent(&board);
    }

    #[test]
    fn double_push_sets_en_passant() {
        let mut board = Board::startpos();
        board.make_move(Move::quiet(sq("e2"), sq("e4")));
        assert_eq!(board.en_passant(), Some(sq("e3")));
        assert_eq!(board.side_to_move(), Color::Black);
        assert_eq!(board.halfmove_clock(), 0);
        assert_eq!(board.fullmove_number(), 1);
        assert_consistent(&board);

        board.make_move(Move::quiet(sq("g8"), sq("f6")));
        assert_eq!(board.en_passant(), None);
        assert_eq!(board.halfmove_clock(), 1);
        assert_eq!(board.fullmove_number(), 2);
        assert_consistent(&board);
    }

    #[test]
    fn en_passant_removes_passed_pawn() {
        let mut board =
            Board::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3").unwrap();
        let before = board;
        let m = Move::en_passant(sq("e5"), sq("f6"));
        let undo = board.make_move(m);
        assert_eq!(undo.captured, Some(ColoredPiece::new(Color::Black, Piece::Pawn)));
        assert_eq!(board.piece_at(sq("f5")), None);
        assert_eq!(board.piece_at(sq("f6")), Some(ColoredPiece::new(Color::White, Piece::Pawn)));
        assert_consistent(&board);

        board.unmake_move(m, &undo);
        assert_eq!(board, before);
    }

    #[test]
    fn castling_moves_rook_and_clears_rights() {
        let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let before = board;
        let m = Move::castling(Square::E1, Square::C1);
        let undo = board.make_move(m);
        assert_eq!(board.piece_at(Square::D1), Some(ColoredPiece::new(Color::White, Piece::Rook)));
        assert_eq!(board.piece_at(Square::A1), None);
        assert_eq!(board.castling().to_fen(), "kq");
        assert_consistent(&board);

        board.unmake_move(m, &undo);
        assert_eq!(board, before);
    }

    #[test]
    fn promotion_capture_round_trip() {
        let mut board = Board::from_fen("r3k3/1P6/8/8/8/8/8/4K3 w q - 0 1").unwrap();
        let before = board;
        let m = Move::with_promotion(sq("b7"), Square::A8, Some(Piece::Rook), Piece::Queen);
        let undo = board.make_move(m);
        assert_eq!(board.piece_at(Square::A8), Some(ColoredPiece::new(Color::White, Piece::Queen)));
        assert!(board.pieces(Color::White, Piece::Pawn).is_empty());
        assert_eq!(board.castling(), CastlingRights::NONE);
        assert_consistent(&board);

        board.unmake_move(m, &undo);
        assert_eq!(board, before);
    }

    #[test]
    fn clocks_saturate_at_limit() {
        let mut state = BoardState::from_fen("4k3/8/8/8/8/8/8/4K2R b K - 0 1").unwrap();
        state.halfmove_clock = u32::MAX;
        state.fullmove_number = u32::MAX;
        let mut board = Board::from_state(&state).unwrap();
        let before = board;

        let m = Move::quiet(Square::E8, sq("d8"));
        let undo = board.make_move(m);
        assert_eq!(board.halfmove_clock(), u32::MAX);
        assert_eq!(board.fullmove_number(), u32::MAX);
        assert_consistent(&board);

        board.unmake_move(m, &undo);
        assert_eq!(board, before);
    }

    #[test]
    fn from_state_rejects_side_not_to_move_in_check() {
        let state = BoardState::from_fen("8/4k3/8/8/8/8/4R3/4K3 w - - 0 1").unwrap();
        assert_eq!(Board::from_state(&state), Err(StateError::OpponentInCheck));

        let state = BoardState::from_fen("8/4k3/8/8/8/8/4R3/4K3 b - - 0 1").unwrap();
        assert!(Board::from_state(&state).is_ok());
    }

    #[test]
    fn state_round_trip() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        let board = Board::from_fen(fen).unwrap();
        let again = Board::from_state(&board.to_state()).unwrap();
        assert_eq!(again, board);
        assert_eq!(again.to_fen(), fen);
    }
}
