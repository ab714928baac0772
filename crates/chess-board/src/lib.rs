//! Bitboard chess position with legal move generation.
//!
//! This crate provides:
//! - [`Bitboard`] - 64-bit square sets with bit-scans and shifts
//! - [`Board`] - copyable placement and state with reversible make/unmake
//! - [`Position`] - a game in progress: repetition history, cached legal
//!   moves, outcome flags and an undo stack
//! - Move generation, check detection and the legality filter
//! - Long-form, SAN and UCI move text
//! - Perft node counting
//!
//! # Architecture
//!
//! Pieces live in per-color, per-kind bitboards mirrored by a square array.
//! Sliding attacks come from precomputed rays truncated at the nearest
//! blocker. The attack tables are built once per process and shared.
//!
//! # Example
//!
//! ```
//! use chess_board::{san, Position};
//!
//! let mut position = Position::startpos();
//! println!("Legal moves from starting position: {}", position.legal_moves().len());
//!
//! position.make_move_san("e4").unwrap();
//! position.make_move_san("e5").unwrap();
//! let m = position.legal_moves().iter().copied().find(|m| m.to_uci() == "g1f3").unwrap();
//! assert_eq!(san::long_form(&position, m), "Ng1-f3");
//! println!("Position after 1.e4 e5: {}", position.to_fen());
//! ```

mod bitboard;
mod board;
pub mod movegen;
mod position;
pub mod rules;
pub mod san;
mod zobrist;

pub use bitboard::{Bitboard, BitboardIter};
pub use board::{Board, UndoRecord};
pub use movegen::perft::{perft, perft_copy, perft_divide, perft_parallel};
pub use movegen::{
    attack_tables, bishop_attacks, generate_legal_moves, generate_pseudo_legal, is_in_check,
    is_legal, is_square_attacked, king_attacks, knight_attacks, queen_attacks, rook_attacks,
    MoveList,
};
pub use position::{Position, PositionError};
pub use rules::{is_insufficient_material, DrawReason, GameResult, Status};
pub use san::{long_form, move_to_san, san_to_move, short_form, uci_to_move, SanError};
pub use zobrist::{ZobristKeys, ZOBRIST};
