//! Piece kinds and colored pieces.

use crate::Color;
use serde::{Deserialize, Serialize};

/// The six kinds of chess pieces.
///
/// Discriminants start at 1 so per-kind tables can be indexed directly,
/// leaving slot 0 of a seven-slot array unused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Piece {
    Pawn = 1,
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
    King = 6,
}

impl Piece {
    /// All piece kinds in order.
    pub const ALL: [Piece; 6] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    /// Promotion choices, in the order they are generated.
    pub const PROMOTIONS: [Piece; 4] = [Piece::Queen, Piece::Rook, Piece::Knight, Piece::Bishop];

    /// Returns the table index of this piece kind (1-6).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Decodes a kind from its index; 0 and out-of-range values are `None`.
    #[inline]
    pub const fn from_index(index: u8) -> Option<Piece> {
        match index {
            1 => Some(Piece::Pawn),
            2 => Some(Piece::Knight),
            3 => Some(Piece::Bishop),
            4 => Some(Piece::Rook),
            5 => Some(Piece::Queen),
            6 => Some(Piece::King),
            _ => None,
        }
    }

    /// Upper-case letter used in move text (`P` for pawns).
    pub const fn letter(self) -> char {
        match self {
            Piece::Pawn => 'P',
            Piece::Knight => 'N',
            Piece::Bishop => 'B',
            Piece::Rook => 'R',
            Piece::Queen => 'Q',
            Piece::King => 'K',
        }
    }

    /// Parses an upper-case move-text letter.
    pub const fn from_letter(c: char) -> Option<Piece> {
        match c {
            'P' => Some(Piece::Pawn),
            'N' => Some(Piece::Knight),
            'B' => Some(Piece::Bishop),
            'R' => Some(Piece::Rook),
            'Q' => Some(Piece::Queen),
            'K' => Some(Piece::King),
            _ => None,
        }
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Piece::Pawn => "Pawn",
            Piece::Knight => "Knight",
            Piece::Bishop => "Bishop",
            Piece::Rook => "Rook",
            Piece::Queen => "Queen",
            Piece::King => "King",
        };
        write!(f, "{}", name)
    }
}

/// A piece of a given color standing on a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColoredPiece {
    pub color: Color,
    pub piece: Piece,
}

impl ColoredPiece {
    #[inline]
    pub const fn new(color: Color, piece: Piece) -> Self {
        ColoredPiece { color, piece }
    }

    /// Returns the FEN character (upper case for White).
    pub const fn to_fen_char(self) -> char {
        let c = self.piece.letter();
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    /// Parses a FEN character into a colored piece.
    pub const fn from_fen_char(c: char) -> Option<Self> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        match Piece::from_letter(c.to_ascii_uppercase()) {
            Some(piece) => Some(ColoredPiece { color, piece }),
            None => None,
        }
    }
}

impl std::fmt::Display for ColoredPiece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.color, self.piece)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_indices_skip_zero() {
        assert_eq!(Piece::Pawn.index(), 1);
        assert_eq!(Piece::King.index(), 6);
        assert_eq!(Piece::from_index(0), None);
        assert_eq!(Piece::from_index(7), None);
        for piece in Piece::ALL {
            assert_eq!(Piece::from_index(piece.index() as u8), Some(piece));
        }
    }

    #[test]
    fn fen_chars() {
        let wp = ColoredPiece::new(Color::White, Piece::Pawn);
        let bn = ColoredPiece::new(Color::Black, Piece::Knight);
        assert_eq!(wp.to_fen_char(), 'P');
        assert_eq!(bn.to_fen_char(), 'n');
        assert_eq!(ColoredPiece::from_fen_char('K'), Some(ColoredPiece::new(Color::White, Piece::King)));
        assert_eq!(ColoredPiece::from_fen_char('q'), Some(ColoredPiece::new(Color::Black, Piece::Queen)));
        assert_eq!(ColoredPiece::from_fen_char('x'), None);
    }

    #[test]
    fn option_is_compact() {
        assert_eq!(std::mem::size_of::<Option<ColoredPiece>>(), 2);
    }
}
