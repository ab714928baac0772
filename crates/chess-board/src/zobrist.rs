//! Zobrist hashing for position identification.
//!
//! A position hash is the XOR of random keys for:
//! - each piece on each square
//! - black to move
//! - each held castling right
//! - the en passant file, when an en passant square is set

use chess_core::{CastlingRights, Color, ColoredPiece, Square};

/// Zobrist hash keys.
///
/// Generated at compile time from a fixed seed so hashes are reproducible.
pub struct ZobristKeys {
    /// Keys for pieces: [color][kind][square]. Kind slot 0 is unused.
    pieces: [[[u64; 64]; 7]; 2],
    black_to_move: u64,
    castling: [u64; 4],
    en_passant: [u64; 8],
}

impl ZobristKeys {
    const fn new() -> Self {
        const fn next_random(state: u64) -> u64 {
            let mut x = state;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            x
        }

        let mut state = 0x9E37_79B9_7F4A_7C15u64;
        let mut pieces = [[[0u64; 64]; 7]; 2];
        let mut castling = [0u64; 4];
        let mut en_passant = [0u64; 8];

        let mut color = 0;
        while color < 2 {
            let mut kind = 1;
            while kind < 7 {
                let mut square = 0;
                while square < 64 {
                    state = next_random(state);
                    pieces[color][kind][square] = state;
                    square += 1;
                }
                kind += 1;
            }
            color += 1;
        }

        state = next_random(state);
        let black_to_move = state;

        let mut i = 0;
        while i < 4 {
            state = next_random(state);
            castling[i] = state;
            i += 1;
        }

        let mut i = 0;
        while i < 8 {
            state = next_random(state);
            en_passant[i] = state;
            i += 1;
        }

        ZobristKeys {
            pieces,
            black_to_move,
            castling,
            en_passant,
        }
    }

    /// Returns the key for a piece on a square.
    #[inline]
    pub const fn piece(&self, piece: ColoredPiece, square: Square) -> u64 {
        self.pieces[piece.color.index()][piece.piece.index()][square.index() as usize]
    }

    #[inline]
    pub const fn side(&self, color: Color) -> u64 {
        match color {
            Color::White => 0,
            Color::Black => self.black_to_move,
        }
    }

    /// Returns the combined key for every right held.
    #[inline]
    pub const fn castling(&self, rights: CastlingRights) -> u64 {
        let mut key = 0;
        let mut bit = 0;
        while bit < 4 {
            if rights.raw() & (1 << bit) != 0 {
                key ^= self.castling[bit];
            }
            bit += 1;
        }
        key
    }

    /// Returns the key for an en passant square (by file), or 0 for none.
    #[inline]
    pub const fn en_passant(&self, square: Option<Square>) -> u64 {
        match square {
            Some(sq) => self.en_passant[sq.file_index() as usize],
            None => 0,
        }
    }
}

/// Global Zobrist keys (initialized at compile time).
pub static ZOBRIST: ZobristKeys = ZobristKeys::new();
