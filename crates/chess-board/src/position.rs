//! The full game aggregate.
//!
//! [`Position`] wraps a [`Board`] with everything needed to play a game:
//! a repetition history keyed by hash, the cached legal-move list, the
//! outcome flags and an undo stack. The cache and flags are rebuilt after
//! every load, move and undo, so callers always see a consistent view.

use crate::movegen::generate_legal_moves;
use crate::rules::{DrawReason, GameResult, Status};
use crate::san::{san_to_move, uci_to_move, SanError};
use crate::{Board, MoveList, UndoRecord};
use chess_core::{BoardState, Color, ColoredPiece, FenError, Move, Square, StateError};
use std::collections::HashMap;
use thiserror::Error;

/// Error type for checked move application.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    /// The move is not legal in the current position.
    #[error("illegal move: {0}")]
    IllegalMove(String),
    /// The game has already ended.
    #[error("game has already ended")]
    GameOver,
    /// The move text could not be resolved.
    #[error(transparent)]
    San(#[from] SanError),
}

/// A chess game in progress.
///
/// Cloning gives an independent copy, history map included, which is
/// what parallel exploration works on.
#[derive(Debug, Clone)]
pub struct Position {
    board: Board,
    /// Occurrences of every position hash reached along the current line.
    history: HashMap<u64, u32>,
    legal_moves: MoveList,
    status: Status,
    undo_stack: Vec<(Move, UndoRecord)>,
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl Position {
    /// Creates a position at the standard starting layout.
    pub fn new() -> Self {
        Self::startpos()
    }

    pub fn startpos() -> Self {
        Self::with_board(Board::startpos())
    }

    /// Creates a position from structured state.
    pub fn from_state(state: &BoardState) -> Result<Self, StateError> {
        Ok(Self::with_board(Board::from_state(state)?))
    }

    /// Creates a position from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Ok(Self::with_board(Board::from_fen(fen)?))
    }

    fn with_board(board: Board) -> Self {
        let mut position = Position {
            board,
            history: HashMap::new(),
            legal_moves: MoveList::new(),
            status: Status::default(),
            undo_stack: Vec::new(),
        };
        position.install(board);
        position
    }

    /// Replaces the current game with `state`.
    ///
    /// The state is fully validated first; on error `self` is untouched.
    pub fn load(&mut self, state: &BoardState) -> Result<(), StateError> {
        let board = Board::from_state(state).map_err(|err| {
            tracing::debug!(error = %err, "rejected position state");
            err
        })?;
        self.install(board);
        tracing::debug!(fen = %self.to_fen(), "position loaded");
        Ok(())
    }

    /// Restores the standard starting layout and clears all history.
    pub fn reset(&mut self) {
        self.install(Board::startpos());
        tracing::debug!("position reset");
    }

    /// Exports the externally visible state.
    pub fn to_state(&self) -> BoardState {
        self.board.to_state()
    }

    pub fn to_fen(&self) -> String {
        self.board.to_fen()
    }

    fn install(&mut self, board: Board) {
        self.board = board;
        self.undo_stack.clear();
        self.history.clear();
        self.history.insert(board.hash(), 1);
        self.refresh();
    }

    fn refresh(&mut self) {
        self.legal_moves = generate_legal_moves(&self.board);
        self.status = Status::classify(&self.board, &self.legal_moves, self.occurrences());
    }

    /// Plays a move from the legal-move list without checking it.
    ///
    /// Use [`Position::try_make_move`] for moves from untrusted input.
    pub fn make_move(&mut self, m: Move) {
        debug_assert!(self.legal_moves.contains(m), "illegal move {}", m);
        let undo = self.board.make_move(m);
        self.undo_stack.push((m, undo));
        *self.history.entry(self.board.hash()).or_insert(0) += 1;
        self.refresh();
    }

    /// Plays a move after checking that the game is running and the move is legal.
    pub fn try_make_move(&mut self, m: Move) -> Result<(), PositionError> {
        if self.status.is_finished() {
            return Err(PositionError::GameOver);
        }
        if !self.legal_moves.contains(m) {
            return Err(PositionError::IllegalMove(m.to_uci()));
        }
        self.make_move(m);
        Ok(())
    }

    /// Plays a move given in SAN.
    pub fn make_move_san(&mut self, san: &str) -> Result<Move, PositionError> {
        if self.status.is_finished() {
            return Err(PositionError::GameOver);
        }
        let m = san_to_move(self, san)?;
        self.make_move(m);
        Ok(m)
    }

    /// Plays a move given in UCI coordinates.
    pub fn make_move_uci(&mut self, uci: &str) -> Result<Move, PositionError> {
        if self.status.is_finished() {
            return Err(PositionError::GameOver);
        }
        let m = uci_to_move(self, uci)?;
        self.make_move(m);
        Ok(m)
    }

    /// Takes back the last move, returning it, or `None` at the start of history.
    pub fn undo_move(&mut self) -> Option<Move> {
        let (m, undo) = self.undo_stack.pop()?;
        let hash = self.board.hash();
        if let Some(count) = self.history.get_mut(&hash) {
            *count -= 1;
            if *count == 0 {
                self.history.remove(&hash);
            }
        }
        self.board.unmake_move(m, &undo);
        self.refresh();
        Some(m)
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn legal_moves(&self) -> &MoveList {
        &self.legal_moves
    }

    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<ColoredPiece> {
        self.board.piece_at(sq)
    }

    #[inline]
    pub fn hash(&self) -> u64 {
        self.board.hash()
    }

    /// How often the current position has occurred in this game.
    pub fn occurrences(&self) -> u32 {
        self.history.get(&self.board.hash()).copied().unwrap_or(0)
    }

    /// Number of moves that can be undone.
    pub fn ply_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Moves played since the last load or reset, oldest first.
    pub fn moves_played(&self) -> impl Iterator<Item = Move> + '_ {
        self.undo_stack.iter().map(|(m, _)| *m)
    }

    pub fn is_check(&self) -> bool {
        self.status.check
    }

    pub fn is_checkmate(&self) -> bool {
        self.status.checkmate
    }

    pub fn is_stalemate(&self) -> bool {
        self.status.stalemate
    }

    pub fn is_insufficient_material(&self) -> bool {
        self.status.insufficient_material
    }

    pub fn is_threefold_repetition(&self) -> bool {
        self.status.threefold_repetition
    }

    pub fn is_fivefold_repetition(&self) -> bool {
        self.status.fivefold_repetition
    }

    pub fn is_fifty_move_rule(&self) -> bool {
        self.status.fifty_move_rule
    }

    pub fn is_seventy_five_move_rule(&self) -> bool {
        self.status.seventy_five_move_rule
    }

    /// True when the game has ended without a claim being needed.
    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    /// Returns the game result if the game is over.
    pub fn result(&self) -> Option<GameResult> {
        self.status.result(self.side_to_move())
    }

    /// A draw the side to move could claim right now.
    pub fn claimable_draw(&self) -> Option<DrawReason> {
        self.status.claimable_draw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_position() {
        let pos = Position::new();
        assert_eq!(pos.ply_count(), 0);
        assert_eq!(pos.legal_moves().len(), 20);
        assert_eq!(pos.occurrences(), 1);
        assert!(!pos.is_finished());
        assert!(!pos.is_check());
    }

    #[test]
    fn make_move_uci() {
        let mut pos = Position::new();
        let m = pos.make_move_uci("e2e4").unwrap();
        assert_eq!(pos.ply_count(), 1);
        assert_eq!(pos.moves_played().collect::<Vec<_>>(), vec![m]);
        assert_eq!(pos.side_to_move(), Color::Black);
    }

    #[test]
    fn illegal_move_is_rejected() {
        let mut pos = Position::new();
        let before = pos.to_fen();
        assert!(matches!(pos.make_move_uci("e2e5"), Err(PositionError::San(_))));
        let bogus = Move::quiet(Square::E1, Square::E8);
        assert_eq!(pos.try_make_move(bogus), Err(PositionError::IllegalMove("e1e8".into())));
        assert_eq!(pos.to_fen(), before);
    }

    #[test]
    fn checkmate_fools_mate() {
        let mut pos = Position::new();
        for san in ["f3", "e5", "g4", "Qh4#"] {
            pos.make_move_san(san).unwrap();
        }
        assert!(pos.is_checkmate() && pos.is_check());
        assert!(pos.legal_moves().is_empty());
        assert_eq!(pos.result(), Some(GameResult::BlackWins));
        assert_eq!(pos.make_move_san("e4"), Err(PositionError::GameOver));
    }

    #[test]
    fn stalemate_on_load() {
        let pos = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(pos.is_stalemate() && !pos.is_check());
        assert_eq!(pos.result(), Some(GameResult::Draw(DrawReason::Stalemate)));
    }

    #[test]
    fn threefold_on_second_repetition() {
        let mut pos = Position::new();
        let cycle = ["Nf3", "Nf6", "Ng1", "Ng8"];
        for san in cycle {
            pos.make_move_san(san).unwrap();
        }
        assert_eq!(pos.occurrences(), 2);
        assert!(!pos.is_threefold_repetition());
        assert_eq!(pos.claimable_draw(), None);

        for san in cycle {
            pos.make_move_san(san).unwrap();
        }
        assert_eq!(pos.occurrences(), 3);
        assert!(pos.is_threefold_repetition());
        assert!(!pos.is_finished());
        assert_eq!(pos.claimable_draw(), Some(DrawReason::ThreefoldRepetition));
    }

    #[test]
    fn fivefold_ends_the_game() {
        let mut pos = Position::new();
        for _ in 0..4 {
            for san in ["Nc3", "Nc6", "Nb1", "Nb8"] {
                pos.make_move_san(san).unwrap();
            }
        }
        assert_eq!(pos.occurrences(), 5);
        assert!(pos.is_fivefold_repetition() && pos.is_finished());
        assert_eq!(pos.result(), Some(GameResult::Draw(DrawReason::FivefoldRepetition)));
    }

    #[test]
    fn undo_restores_history_and_flags() {
        let mut pos = Position::new();
        for san in ["Nf3", "Nf6", "Ng1", "Ng8", "Nf3", "Nf6", "Ng1", "Ng8"] {
            pos.make_move_san(san).unwrap();
        }
        assert!(pos.is_threefold_repetition());

        let undone = pos.undo_move().unwrap();
        assert_eq!(undone.to_uci(), "f6g8");
        assert!(!pos.is_threefold_repetition());
        assert_eq!(pos.occurrences(), 2);
        assert_eq!(pos.legal_moves().len(), generate_legal_moves(pos.board()).len());

        while pos.undo_move().is_some() {}
        assert_eq!(pos.to_fen(), chess_core::STARTPOS_FEN);
        assert_eq!(pos.occurrences(), 1);
        assert_eq!(pos.undo_move(), None);
    }

    #[test]
    fn seventy_five_move_rule_on_load() {
        let pos = Position::from_fen("8/8/8/8/8/8/8/R3K2k w Q - 150 100").unwrap();
        assert!(pos.is_seventy_five_move_rule() && pos.is_fifty_move_rule());
        assert_eq!(pos.result(), Some(GameResult::Draw(DrawReason::SeventyFiveMoveRule)));
    }

    #[test]
    fn fifty_move_rule_is_claimable() {
        let mut pos = Position::from_fen("8/8/8/8/8/8/8/R3K2k w Q - 99 60").unwrap();
        assert_eq!(pos.claimable_draw(), None);
        pos.make_move_uci("a1a2").unwrap();
        assert!(pos.is_fifty_move_rule());
        assert!(!pos.is_finished());
        assert_eq!(pos.claimable_draw(), Some(DrawReason::FiftyMoveRule));
    }

    #[test]
    fn load_rejects_bad_state_and_keeps_game() {
        let mut pos = Position::new();
        pos.make_move_san("e4").unwrap();
        let before = pos.to_fen();

        let mut state = BoardState::startpos();
        state.placement.truncate(10);
        assert_eq!(pos.load(&state), Err(StateError::PlacementLength(10)));
        assert_eq!(pos.to_fen(), before);
        assert_eq!(pos.ply_count(), 1);
    }

    #[test]
    fn load_and_reset_reseed_history() {
        let mut pos = Position::new();
        pos.make_move_san("d4").unwrap();
        let state = BoardState::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").unwrap();
        pos.load(&state).unwrap();
        assert_eq!(pos.ply_count(), 0);
        assert_eq!(pos.occurrences(), 1);
        assert_eq!(pos.to_state(), state);

        pos.reset();
        assert_eq!(pos.to_fen(), chess_core::STARTPOS_FEN);
        assert_eq!(pos.legal_moves().len(), 20);
    }

    #[test]
    fn clones_are_independent() {
        let mut a = Position::new();
        let b = a.clone();
        a.make_move_san("e4").unwrap();
        assert_eq!(b.ply_count(), 0);
        assert_eq!(b.occurrences(), 1);
        assert_ne!(a.hash(), b.hash());
    }
}
