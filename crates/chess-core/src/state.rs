//! Structured position state for loading and saving.

use crate::{CastlingRights, Color, ColoredPiece, Piece, Square};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors for structured state that does not describe a playable position.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("placement must have 64 squares, got {0}")]
    PlacementLength(usize),

    #[error("{color} must have exactly one king, found {count}")]
    KingCount { color: Color, count: usize },

    #[error("pawn on back rank at {0}")]
    PawnOnBackRank(Square),

    #[error("invalid en passant square {0}")]
    EnPassant(Square),

    #[error("castling right '{0}' without king and rook on their original squares")]
    CastlingRights(char),

    #[error("fullmove number must be at least 1")]
    FullmoveZero,

    #[error("side not to move is in check")]
    OpponentInCheck,
}

/// Every externally visible field of a position.
///
/// `placement` is indexed by square, a1 first and h8 last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    pub placement: Vec<Option<ColoredPiece>>,
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl BoardState {
    /// Returns the standard starting position.
    pub fn startpos() -> Self {
        const BACK: [Piece; 8] = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        let mut placement = vec![None; 64];
        for (file, &piece) in BACK.iter().enumerate() {
            placement[file] = Some(ColoredPiece::new(Color::White, piece));
            placement[8 + file] = Some(ColoredPiece::new(Color::White, Piece::Pawn));
            placement[48 + file] = Some(ColoredPiece::new(Color::Black, Piece::Pawn));
            placement[56 + file] = Some(ColoredPiece::new(Color::Black, piece));
        }
        BoardState {
            placement,
            side_to_move: Color::White,
            castling: CastlingRights::ALL,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Returns the piece on `sq`.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<ColoredPiece> {
        self.placement.get(sq.index() as usize).copied().flatten()
    }

    /// Checks shape and range constraints that need no attack information.
    ///
    /// Whether the side not to move is in check is left to the board layer.
    pub fn validate(&self) -> Result<(), StateError> {
        if self.placement.len() != 64 {
            return Err(StateError::PlacementLength(self.placement.len()));
        }
        if self.fullmove_number == 0 {
            return Err(StateError::FullmoveZero);
        }

        for color in Color::ALL {
            let count = self
                .placement
                .iter()
                .filter(|p| **p == Some(ColoredPiece::new(color, Piece::King)))
                .count();
            if count != 1 {
                return Err(StateError::KingCount { color, count });
            }
        }

        for (index, piece) in self.placement.iter().enumerate() {
            if let Some(ColoredPiece { piece: Piece::Pawn, .. }) = piece {
                let sq = Square::from_index_masked(index as u8);
                if sq.rank_index() == 0 || sq.rank_index() == 7 {
                    return Err(StateError::PawnOnBackRank(sq));
                }
            }
        }

        self.validate_castling()?;
        self.validate_en_passant()
    }

    fn validate_castling(&self) -> Result<(), StateError> {
        let checks = [
            ('K', Color::White, Square::E1, Square::H1, self.castling.can_castle_kingside(Color::White)),
            ('Q', Color::White, Square::E1, Square::A1, self.castling.can_castle_queenside(Color::White)),
            ('k', Color::Black, Square::E8, Square::H8, self.castling.can_castle_kingside(Color::Black)),
            ('q', Color::Black, Square::E8, Square::A8, self.castling.can_castle_queenside(Color::Black)),
        ];
        for (letter, color, king, rook, held) in checks {
            if !held {
                continue;
            }
            let king_ok = self.piece_at(king) == Some(ColoredPiece::new(color, Piece::King));
            let rook_ok = self.piece_at(rook) == Some(ColoredPiece::new(color, Piece::Rook));
            if !king_ok || !rook_ok {
                return Err(StateError::CastlingRights(letter));
            }
        }
        Ok(())
    }

    fn validate_en_passant(&self) -> Result<(), StateError> {
        let Some(ep) = self.en_passant else {
            return Ok(());
        };
        // The side that just moved double-pushed past `ep`.
        let mover = self.side_to_move.opposite();
        let expected_rank = match mover {
            Color::White => 2,
            Color::Black => 5,
        };
        let pushed = ep.offset(mover.pawn_push().signum(), 0);
        let origin = ep.offset(-mover.pawn_push().signum(), 0);
        let valid = ep.rank_index() == expected_rank
            && self.piece_at(ep).is_none()
            && origin.is_some_and(|sq| self.piece_at(sq).is_none())
            && pushed.is_some_and(|sq| self.piece_at(sq) == Some(ColoredPiece::new(mover, Piece::Pawn)));
        if valid {
            Ok(())
        } else {
            Err(StateError::EnPassant(ep))
        }
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::startpos()
    }
}
