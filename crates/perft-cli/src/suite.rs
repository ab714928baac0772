//! Perft suite files.
//!
//! A suite is a TOML file listing positions and their reference node
//! counts for depths 1..=n:
//!
//! ```toml
//! [[positions]]
//! name = "startpos"
//! fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
//! counts = [20, 400, 8902]
//! ```

use chess_board::{perft_parallel, Position};
use chess_core::FenError;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading a suite.
#[derive(Error, Debug)]
pub enum SuiteError {
    /// Failed to read the suite file from disk.
    #[error("Failed to read suite file: {0}")]
    Read(#[from] std::io::Error),
    /// Failed to parse the suite file as valid TOML.
    #[error("Failed to parse suite: {0}")]
    Parse(#[from] toml::de::Error),
    /// The suite lists no positions.
    #[error("Suite contains no positions")]
    Empty,
}

/// One position with its expected node counts.
#[derive(Debug, Deserialize, Clone)]
pub struct SuitePosition {
    pub name: String,
    pub fen: String,
    /// Expected counts, index 0 is depth 1.
    #[serde(default)]
    pub counts: Vec<u64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct Suite {
    #[serde(default)]
    pub positions: Vec<SuitePosition>,
}

impl Suite {
    /// Loads a suite from disk.
    pub fn load(path: &Path) -> Result<Self, SuiteError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, SuiteError> {
        let suite: Suite = toml::from_str(content)?;
        if suite.positions.is_empty() {
            return Err(SuiteError::Empty);
        }
        Ok(suite)
    }
}

/// Outcome of one depth of one suite position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthResult {
    pub depth: u32,
    pub expected: u64,
    pub actual: u64,
}

impl DepthResult {
    pub fn passed(&self) -> bool {
        self.expected == self.actual
    }
}

/// Runs `entry` for every listed depth up to `max_depth`.
pub fn run_position(
    entry: &SuitePosition,
    max_depth: u32,
    threads: usize,
) -> Result<Vec<DepthResult>, FenError> {
    let position = Position::from_fen(&entry.fen)?;
    Ok((1..=max_depth)
        .zip(&entry.counts)
        .map(|(depth, &expected)| DepthResult {
            depth,
            expected,
            actual: perft_parallel(&position, depth, threads),
        })
        .collect())
}
