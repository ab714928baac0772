//! Core types for chess.
//!
//! This crate provides the value types shared by the board crate and its users:
//! - [`Piece`], [`ColoredPiece`] and [`Color`] for piece representation
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Move`] for packed move representation
//! - [`CastlingRights`] and [`BoardState`] for the externally visible state
//! - FEN parsing and serialization

mod castling;
mod color;
mod fen;
mod mov;
mod piece;
mod square;
mod state;

pub use castling::CastlingRights;
pub use color::Color;
pub use fen::{FenError, STARTPOS_FEN};
pub use mov::Move;
pub use piece::{ColoredPiece, Piece};
pub use square::{File, Rank, Square};
pub use state::{BoardState, StateError};
