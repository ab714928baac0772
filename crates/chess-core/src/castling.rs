//! Castling rights.

use crate::{Color, Square};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Castling rights as a 4-bit mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    /// Creates new castling rights from flags; bits above the low four are dropped.
    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    #[inline]
    const fn kingside_flag(color: Color) -> u8 {
        match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        }
    }

    #[inline]
    const fn queenside_flag(color: Color) -> u8 {
        match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        }
    }

    /// Returns true if the given side can castle kingside.
    #[inline]
    pub const fn can_castle_kingside(self, color: Color) -> bool {
        (self.0 & Self::kingside_flag(color)) != 0
    }

    /// Returns true if the given side can castle queenside.
    #[inline]
    pub const fn can_castle_queenside(self, color: Color) -> bool {
        (self.0 & Self::queenside_flag(color)) != 0
    }

    /// Returns the rights left after a move between `from` and `to`.
    ///
    /// A right is lost when its king or rook leaves its original square, or
    /// when anything lands on the rook's original square.
    #[inline]
    pub const fn update_for_move(self, from: Square, to: Square) -> Self {
        CastlingRights(self.0 & Self::keep_mask(from) & Self::keep_mask(to))
    }

    const fn keep_mask(sq: Square) -> u8 {
        match sq.index() {
            0 => !Self::WHITE_QUEENSIDE,
            4 => !(Self::WHITE_KINGSIDE | Self::WHITE_QUEENSIDE),
            7 => !Self::WHITE_KINGSIDE,
            56 => !Self::BLACK_QUEENSIDE,
            60 => !(Self::BLACK_KINGSIDE | Self::BLACK_QUEENSIDE),
            63 => !Self::BLACK_KINGSIDE,
            _ => 0b1111,
        }
    }

    /// Returns the raw flags.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Parses the FEN castling field ("KQkq", "Kq", "-").
    pub fn from_fen(s: &str) -> Option<Self> {
        if s == "-" {
            return Some(Self::NONE);
        }
        if s.is_empty() {
            return None;
        }
        let mut flags = 0u8;
        for c in s.chars() {
            let flag = match c {
                'K' => Self::WHITE_KINGSIDE,
                'Q' => Self::WHITE_QUEENSIDE,
                'k' => Self::BLACK_KINGSIDE,
                'q' => Self::BLACK_QUEENSIDE,
                _ => return None,
            };
            if flags & flag != 0 {
                return None;
            }
            flags |= flag;
        }
        Some(CastlingRights(flags))
    }

    /// Renders the FEN castling field.
    pub fn to_fen(self) -> String {
        if self.0 == 0 {
            return "-".to_string();
        }
        let mut s = String::with_capacity(4);
        if self.can_castle_kingside(Color::White) {
            s.push('K');
        }
        if self.can_castle_queenside(Color::White) {
            s.push('Q');
        }
        if self.can_castle_kingside(Color::Black) {
            s.push('k');
        }
        if self.can_castle_queenside(Color::Black) {
            s.push('q');
        }
        s
    }
}

impl TryFrom<u8> for CastlingRights {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > 0b1111 {
            Err(format!("castling mask out of range: {}", value))
        } else {
            Ok(CastlingRights(value))
        }
    }
}

impl From<CastlingRights> for u8 {
    fn from(rights: CastlingRights) -> u8 {
        rights.0
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fen())
    }
}
