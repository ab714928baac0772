//! FEN (Forsyth-Edwards Notation) parsing and serialization.

use crate::{BoardState, CastlingRights, Color, ColoredPiece, Square, StateError};
use thiserror::Error;

/// The standard starting position FEN.
pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 6 parts, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),

    #[error(transparent)]
    State(#[from] StateError),
}

impl BoardState {
    /// Parses and validates a FEN string.
    ///
    /// Checks that need attack information (the side not to move being in
    /// check) are done when the state is loaded into a board.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        let [placement, color, castling, en_passant, halfmove, fullmove] = parts[..] else {
            return Err(FenError::InvalidPartCount(parts.len()));
        };

        let state = BoardState {
            placement: parse_placement(placement)?,
            side_to_move: match color {
                "w" => Color::White,
                "b" => Color::Black,
                other => return Err(FenError::InvalidActiveColor(other.to_string())),
            },
            castling: CastlingRights::from_fen(castling)
                .ok_or_else(|| FenError::InvalidCastlingRights(castling.to_string()))?,
            en_passant: parse_en_passant(en_passant)?,
            halfmove_clock: halfmove
                .parse()
                .map_err(|_| FenError::InvalidHalfmoveClock(halfmove.to_string()))?,
            fullmove_number: fullmove
                .parse()
                .map_err(|_| FenError::InvalidFullmoveNumber(fullmove.to_string()))?,
        };
        state.validate()?;
        Ok(state)
    }

    /// Renders this state as a FEN string.
    pub fn to_fen(&self) -> String {
        let mut placement = String::new();
        for rank in (0..8).rev() {
            let mut empty_count = 0;
            for file in 0..8 {
                match self.placement.get(rank * 8 + file).copied().flatten() {
                    Some(piece) => {
                        if empty_count > 0 {
                            placement.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        placement.push(piece.to_fen_char());
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                placement.push_str(&empty_count.to_string());
            }
            if rank > 0 {
                placement.push('/');
            }
        }

        let en_passant = self
            .en_passant
            .map_or_else(|| "-".to_string(), Square::to_algebraic);

        format!(
            "{} {} {} {} {} {}",
            placement,
            self.side_to_move.to_fen_char(),
            self.castling.to_fen(),
            en_passant,
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

/// Reads the placement field, rank 8 first, into a square-indexed array.
fn parse_placement(field: &str) -> Result<Vec<Option<ColoredPiece>>, FenError> {
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::InvalidPiecePlacement(format!(
            "expected 8 ranks, got {}",
            ranks.len()
        )));
    }

    let mut placement = vec![None; 64];
    for (i, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - i as i8;
        let mut file = 0i8;
        for c in rank_str.chars() {
            if let Some(digit) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                file += digit as i8;
                continue;
            }
            let piece = ColoredPiece::from_fen_char(c).ok_or_else(|| {
                FenError::InvalidPiecePlacement(format!("invalid character '{}' in rank {}", c, rank + 1))
            })?;
            let sq = Square::from_coords(rank, file).ok_or_else(|| {
                FenError::InvalidPiecePlacement(format!("rank {} has more than 8 squares", rank + 1))
            })?;
            placement[sq.index() as usize] = Some(piece);
            file += 1;
        }
        if file != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "rank {} has {} squares, expected 8",
                rank + 1,
                file
            )));
        }
    }
    Ok(placement)
}

/// En passant targets sit on the third or sixth rank.
fn parse_en_passant(field: &str) -> Result<Option<Square>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    Square::from_algebraic(field)
        .filter(|sq| matches!(sq.rank_index(), 2 | 5))
        .map(Some)
        .ok_or_else(|| FenError::InvalidEnPassantSquare(field.to_string()))
}
