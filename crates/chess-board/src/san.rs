//! Move text: long form, Standard Algebraic Notation (SAN) and UCI.
//!
//! Every rendering is computed against the position BEFORE the move and
//! its cached legal-move list. Examples: "Ng1-f3", "e4", "Nbd2", "O-O",
//! "e8=Q+", "e7e8q".

use crate::movegen::{generate_legal_moves, is_in_check};
use crate::Position;
use chess_core::{File, Move, Piece, Rank, Square};
use thiserror::Error;

/// Error type for move text parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanError {
    /// The move text is empty.
    #[error("empty move text")]
    Empty,
    /// The move text has invalid format.
    #[error("invalid move format: {0}")]
    InvalidFormat(String),
    /// No legal move matches the text.
    #[error("no legal move matches: {0}")]
    NoMatchingMove(String),
    /// Multiple legal moves match the text.
    #[error("ambiguous move: {0}")]
    AmbiguousMove(String),
}

/// Renders a move with both squares, e.g. `Ng1-f3`, `e4xd5`, `e7-e8=Q`.
pub fn long_form(position: &Position, m: Move) -> String {
    if m.is_castling() {
        return castling_text(m).to_string();
    }

    let mut text = String::new();
    let piece = moving_piece(position, m);
    if piece != Piece::Pawn {
        text.push(piece.letter());
    }
    text.push_str(&m.from().to_algebraic());
    text.push(if m.is_capture() { 'x' } else { '-' });
    text.push_str(&m.to().to_algebraic());
    push_promotion(&mut text, m);
    text
}

/// Renders a move in SAN without a check suffix.
pub fn short_form(position: &Position, m: Move) -> String {
    if m.is_castling() {
        return castling_text(m).to_string();
    }

    let mut text = String::new();
    let piece = moving_piece(position, m);
    if piece != Piece::Pawn {
        text.push(piece.letter());
        text.push_str(&disambiguation(position, m, piece));
    }

    if m.is_capture() {
        if piece == Piece::Pawn {
            // Pawn captures include the source file
            text.push(m.from().file().to_char());
        }
        text.push('x');
    }

    text.push_str(&m.to().to_algebraic());
    push_promotion(&mut text, m);
    text
}

/// Renders a move in SAN, including `+` or `#`.
///
/// The move must be legal in `position`.
pub fn move_to_san(position: &Position, m: Move) -> String {
    let mut san = short_form(position, m);

    let mut scratch = *position.board();
    scratch.make_move(m);
    if is_in_check(&scratch, scratch.side_to_move()) {
        if generate_legal_moves(&scratch).is_empty() {
            san.push('#');
        } else {
            san.push('+');
        }
    }
    san
}

/// Parses a SAN string and returns the matching legal move.
pub fn san_to_move(position: &Position, san: &str) -> Result<Move, SanError> {
    let san = san.trim();
    if san.is_empty() {
        return Err(SanError::Empty);
    }

    // Check and annotation suffixes carry no information for matching
    let san = san.trim_end_matches(['+', '#', '!', '?']);

    if san == "O-O" || san == "0-0" {
        return find_castling_move(position, true);
    }
    if san == "O-O-O" || san == "0-0-0" {
        return find_castling_move(position, false);
    }

    let parsed = parse_san_components(san)?;
    find_matching_move(position, &parsed, san)
}

/// Parses coordinate text such as `e2e4` or `e7e8q` against the legal moves.
pub fn uci_to_move(position: &Position, uci: &str) -> Result<Move, SanError> {
    let uci = uci.trim();
    if uci.is_empty() {
        return Err(SanError::Empty);
    }
    if !uci.is_ascii() || !(4..=5).contains(&uci.len()) {
        return Err(SanError::InvalidFormat(uci.to_string()));
    }

    let square = |s: &str| {
        Square::from_algebraic(s).ok_or_else(|| SanError::InvalidFormat(uci.to_string()))
    };
    let from = square(&uci[0..2])?;
    let to = square(&uci[2..4])?;
    let promotion = match uci[4..].chars().next() {
        Some(c) => Some(
            Piece::from_letter(c.to_ascii_uppercase())
                .filter(|p| Piece::PROMOTIONS.contains(p))
                .ok_or_else(|| SanError::InvalidFormat(uci.to_string()))?,
        ),
        None => None,
    };

    position
        .legal_moves()
        .iter()
        .copied()
        .find(|m| m.from() == from && m.to() == to && m.promotion() == promotion)
        .ok_or_else(|| SanError::NoMatchingMove(uci.to_string()))
}

fn castling_text(m: Move) -> &'static str {
    if m.to().file_index() > m.from().file_index() {
        "O-O"
    } else {
        "O-O-O"
    }
}

fn push_promotion(text: &mut String, m: Move) {
    if let Some(promo) = m.promotion() {
        text.push('=');
        text.push(promo.letter());
    }
}

fn moving_piece(position: &Position, m: Move) -> Piece {
    position
        .board()
        .piece_at(m.from())
        .map_or(Piece::Pawn, |p| p.piece)
}

/// Parsed components of a SAN string.
#[derive(Debug)]
struct ParsedSan {
    piece: Piece,
    from_file: Option<File>,
    from_rank: Option<Rank>,
    to_square: Square,
    promotion: Option<Piece>,
    is_capture: bool,
}

fn parse_san_components(san: &str) -> Result<ParsedSan, SanError> {
    let chars: Vec<char> = san.chars().collect();
    let first = *chars.first().ok_or(SanError::Empty)?;

    let mut idx = 0;
    let piece = if first.is_ascii_uppercase() {
        idx += 1;
        Piece::from_letter(first).ok_or_else(|| {
            SanError::InvalidFormat(format!("invalid piece character: {}", first))
        })?
    } else {
        Piece::Pawn
    };

    let remaining: String = chars[idx..].iter().collect();

    let (remaining, is_capture) = if remaining.contains('x') {
        (remaining.replace('x', ""), true)
    } else {
        (remaining, false)
    };

    let (remaining, promotion) = match remaining.split_once('=') {
        Some((head, tail)) => {
            let mut tail_chars = tail.chars();
            let promo = match (tail_chars.next(), tail_chars.next()) {
                (Some(c), None) => Piece::from_letter(c)
                    .filter(|p| Piece::PROMOTIONS.contains(p))
                    .ok_or_else(|| {
                        SanError::InvalidFormat(format!("invalid promotion piece: {}", tail))
                    })?,
                _ => return Err(SanError::InvalidFormat(format!("invalid promotion: {}", san))),
            };
            (head.to_string(), Some(promo))
        }
        None => (remaining, None),
    };

    let chars: Vec<char> = remaining.chars().collect();
    if chars.len() < 2 {
        return Err(SanError::InvalidFormat(format!("too short: {}", san)));
    }

    let to_file = File::from_char(chars[chars.len() - 2])
        .ok_or_else(|| SanError::InvalidFormat(format!("invalid file: {}", san)))?;
    let to_rank = Rank::from_char(chars[chars.len() - 1])
        .ok_or_else(|| SanError::InvalidFormat(format!("invalid rank: {}", san)))?;

    let (from_file, from_rank) = parse_disambiguation(&chars[..chars.len() - 2])?;

    Ok(ParsedSan {
        piece,
        from_file,
        from_rank,
        to_square: Square::new(to_file, to_rank),
        promotion,
        is_capture,
    })
}

fn parse_disambiguation(chars: &[char]) -> Result<(Option<File>, Option<Rank>), SanError> {
    let invalid = || {
        SanError::InvalidFormat(format!(
            "invalid disambiguation: {}",
            chars.iter().collect::<String>()
        ))
    };

    match chars {
        [] => Ok((None, None)),
        [c] => {
            if let Some(f) = File::from_char(*c) {
                Ok((Some(f), None))
            } else if let Some(r) = Rank::from_char(*c) {
                Ok((None, Some(r)))
            } else {
                Err(invalid())
            }
        }
        [f, r] => {
            let file = File::from_char(*f).ok_or_else(invalid)?;
            let rank = Rank::from_char(*r).ok_or_else(invalid)?;
            Ok((Some(file), Some(rank)))
        }
        _ => Err(invalid()),
    }
}

fn find_castling_move(position: &Position, kingside: bool) -> Result<Move, SanError> {
    let name = if kingside { "O-O" } else { "O-O-O" };
    position
        .legal_moves()
        .iter()
        .copied()
        .find(|m| m.is_castling() && castling_text(*m) == name)
        .ok_or_else(|| SanError::NoMatchingMove(name.to_string()))
}

fn find_matching_move(position: &Position, parsed: &ParsedSan, san: &str) -> Result<Move, SanError> {
    let board = position.board();
    let mut matching = position.legal_moves().iter().copied().filter(|m| {
        m.to() == parsed.to_square
            && !m.is_castling()
            && board.piece_at(m.from()).map(|p| p.piece) == Some(parsed.piece)
            && parsed.from_file.map_or(true, |f| m.from().file() == f)
            && parsed.from_rank.map_or(true, |r| m.from().rank() == r)
            && m.promotion() == parsed.promotion
            && (!parsed.is_capture || m.is_capture())
    });

    match (matching.next(), matching.next()) {
        (None, _) => Err(SanError::NoMatchingMove(san.to_string())),
        (Some(m), None) => Ok(m),
        (Some(_), Some(_)) => Err(SanError::AmbiguousMove(san.to_string())),
    }
}

/// File, rank, or both, whichever first separates `m` from other legal
/// moves of the same piece kind to the same square.
fn disambiguation(position: &Position, m: Move, piece: Piece) -> String {
    let board = position.board();
    let from = m.from();
    let rivals: Vec<Square> = position
        .legal_moves()
        .iter()
        .filter(|other| {
            other.to() == m.to()
                && other.from() != from
                && board.piece_at(other.from()).map(|p| p.piece) == Some(piece)
        })
        .map(|other| other.from())
        .collect();

    if rivals.is_empty() {
        String::new()
    } else if rivals.iter().all(|sq| sq.file() != from.file()) {
        from.file().to_char().to_string()
    } else if rivals.iter().all(|sq| sq.rank() != from.rank()) {
        from.rank().to_char().to_string()
    } else {
        from.to_algebraic()
    }
}
