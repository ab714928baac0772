//! Game outcome classification.

use crate::movegen::is_in_check;
use crate::{Board, MoveList};
use chess_core::{Color, Piece};

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    /// White wins by checkmate.
    WhiteWins,
    /// Black wins by checkmate.
    BlackWins,
    /// Draw with a specific reason.
    Draw(DrawReason),
}

/// Reason for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    /// Stalemate - no legal moves but not in check.
    Stalemate,
    /// Insufficient material to checkmate.
    InsufficientMaterial,
    /// 50-move rule (100 half-moves without pawn move or capture) - claimable.
    FiftyMoveRule,
    /// 75-move rule (150 half-moves) - automatic draw.
    SeventyFiveMoveRule,
    /// Threefold repetition - claimable.
    ThreefoldRepetition,
    /// Fivefold repetition - automatic draw.
    FivefoldRepetition,
}

/// Outcome flags derived after every state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Status {
    pub check: bool,
    pub checkmate: bool,
    pub stalemate: bool,
    pub insufficient_material: bool,
    pub threefold_repetition: bool,
    pub fivefold_repetition: bool,
    pub fifty_move_rule: bool,
    pub seventy_five_move_rule: bool,
}

impl Status {
    /// Classifies `board` given its legal moves and how often its hash has occurred.
    pub fn classify(board: &Board, legal_moves: &MoveList, occurrences: u32) -> Self {
        let check = is_in_check(board, board.side_to_move());
        let no_moves = legal_moves.is_empty();
        let checkmate = check && no_moves;
        Status {
            check,
            checkmate,
            stalemate: !checkmate && no_moves,
            insufficient_material: is_insufficient_material(board),
            threefold_repetition: occurrences >= 3,
            fivefold_repetition: occurrences >= 5,
            fifty_move_rule: board.halfmove_clock() >= 100,
            seventy_five_move_rule: board.halfmove_clock() >= 150,
        }
    }

    /// True once the game has ended without anyone needing to claim it.
    pub fn is_finished(&self) -> bool {
        self.checkmate
            || self.stalemate
            || self.insufficient_material
            || self.fivefold_repetition
            || self.seventy_five_move_rule
    }

    /// The result of a finished game, `None` while play continues.
    pub fn result(&self, side_to_move: Color) -> Option<GameResult> {
        if self.checkmate {
            return Some(match side_to_move {
                Color::White => GameResult::BlackWins,
                Color::Black => GameResult::WhiteWins,
            });
        }
        let reason = if self.stalemate {
            DrawReason::Stalemate
        } else if self.fivefold_repetition {
            DrawReason::FivefoldRepetition
        } else if self.seventy_five_move_rule {
            DrawReason::SeventyFiveMoveRule
        } else if self.insufficient_material {
            DrawReason::InsufficientMaterial
        } else {
            return None;
        };
        Some(GameResult::Draw(reason))
    }

    /// A draw the side to move may claim in an unfinished game.
    pub fn claimable_draw(&self) -> Option<DrawReason> {
        if self.is_finished() {
            None
        } else if self.threefold_repetition {
            Some(DrawReason::ThreefoldRepetition)
        } else if self.fifty_move_rule {
            Some(DrawReason::FiftyMoveRule)
        } else {
            None
        }
    }
}

/// Conservative material test.
///
/// Neither side may hold a queen, rook or pawn, a bishop together with a
/// knight, two bishops, or two knights. Bishop colors are not considered.
pub fn is_insufficient_material(board: &Board) -> bool {
    Color::ALL.iter().all(|&color| {
        let heavy = board.pieces(color, Piece::Queen)
            | board.pieces(color, Piece::Rook)
            | board.pieces(color, Piece::Pawn);
        let bishops = board.pieces(color, Piece::Bishop).count();
        let knights = board.pieces(color, Piece::Knight).count();
        heavy.is_empty() && bishops + knights <= 1
    })
}
