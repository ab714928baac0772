//! Move representation.

use crate::{Piece, Square};
use std::fmt;

const TO_SHIFT: u32 = 6;
const EN_PASSANT_BIT: u32 = 1 << 12;
const CASTLING_BIT: u32 = 1 << 13;
const PROMOTION_SHIFT: u32 = 14;
const CAPTURED_SHIFT: u32 = 17;
const SQUARE_MASK: u32 = 0x3F;
const KIND_MASK: u32 = 0x7;

/// A chess move.
///
/// Packed into 32 bits:
///
/// | bits  | field                          |
/// |-------|--------------------------------|
/// | 0-5   | source square                  |
/// | 6-11  | destination square             |
/// | 12    | en passant                     |
/// | 13    | castling                       |
/// | 14-16 | promotion kind (0 = none)      |
/// | 17-19 | captured kind (0 = none)       |
///
/// The captured kind always names the piece actually removed: for en passant
/// that is the pawn beside the destination, not the (empty) destination.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u32);

impl Move {
    /// A null move (used as placeholder, not a legal move).
    pub const NULL: Move = Move(0);

    /// Creates a normal move, optionally capturing the piece on `to`.
    #[inline]
    pub const fn new(from: Square, to: Square, captured: Option<Piece>) -> Self {
        let captured = match captured {
            Some(p) => p as u32,
            None => 0,
        };
        Move(
            from.index() as u32
                | ((to.index() as u32) << TO_SHIFT)
                | (captured << CAPTURED_SHIFT),
        )
    }

    /// Creates a quiet (non-capturing) move.
    #[inline]
    pub const fn quiet(from: Square, to: Square) -> Self {
        Self::new(from, to, None)
    }

    /// Creates an en passant capture; the captured kind is always a pawn.
    #[inline]
    pub const fn en_passant(from: Square, to: Square) -> Self {
        Move(Self::new(from, to, Some(Piece::Pawn)).0 | EN_PASSANT_BIT)
    }

    /// Creates a castling move, encoded as the king's two-square step.
    #[inline]
    pub const fn castling(from: Square, to: Square) -> Self {
        Move(Self::quiet(from, to).0 | CASTLING_BIT)
    }

    /// Creates a promotion, optionally capturing on `to`.
    #[inline]
    pub const fn with_promotion(
        from: Square,
        to: Square,
        captured: Option<Piece>,
        promote_to: Piece,
    ) -> Self {
        Move(Self::new(from, to, captured).0 | ((promote_to as u32) << PROMOTION_SHIFT))
    }

    /// Returns the source square.
    #[inline]
    pub const fn from(self) -> Square {
        Square::from_index_masked((self.0 & SQUARE_MASK) as u8)
    }

    /// Returns the destination square.
    #[inline]
    pub const fn to(self) -> Square {
        Square::from_index_masked(((self.0 >> TO_SHIFT) & SQUARE_MASK) as u8)
    }

    /// Returns the kind of the piece this move removes, if any.
    #[inline]
    pub const fn captured(self) -> Option<Piece> {
        Piece::from_index(((self.0 >> CAPTURED_SHIFT) & KIND_MASK) as u8)
    }

    /// Returns true if this move removes an enemy piece.
    #[inline]
    pub const fn is_capture(self) -> bool {
        (self.0 >> CAPTURED_SHIFT) & KIND_MASK != 0
    }

    /// Returns the promotion kind, if this is a promotion.
    #[inline]
    pub const fn promotion(self) -> Option<Piece> {
        Piece::from_index(((self.0 >> PROMOTION_SHIFT) & KIND_MASK) as u8)
    }

    /// Returns true if this is a promotion move.
    #[inline]
    pub const fn is_promotion(self) -> bool {
        (self.0 >> PROMOTION_SHIFT) & KIND_MASK != 0
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        self.0 & EN_PASSANT_BIT != 0
    }

    #[inline]
    pub const fn is_castling(self) -> bool {
        self.0 & CASTLING_BIT != 0
    }

    /// Returns the raw packed value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns the UCI notation for this move (e.g., "e2e4", "e7e8q").
    pub fn to_uci(self) -> String {
        let promo = match self.promotion() {
            Some(Piece::Knight) => "n",
            Some(Piece::Bishop) => "b",
            Some(Piece::Rook) => "r",
            Some(Piece::Queen) => "q",
            _ => "",
        };
        format!("{}{}{}", self.from(), self.to(), promo)
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self.to_uci())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}
