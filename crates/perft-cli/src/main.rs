//! Perft - counts leaf nodes of the legal move tree.
//!
//! Compares the move generator against published node counts, either for a
//! single FEN or for every position in a TOML suite.

mod suite;

use chess_board::{perft_divide, perft_parallel, Position};
use chess_core::STARTPOS_FEN;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;
use suite::Suite;

/// Perft - counts move-generation leaf nodes.
#[derive(Parser)]
#[command(name = "perft")]
#[command(about = "Counts legal move tree leaf nodes to validate move generation")]
struct Args {
    /// Position to count from, in FEN
    #[arg(long, default_value = STARTPOS_FEN)]
    fen: String,

    /// Search depth in plies (maximum depth when running a suite)
    #[arg(long, default_value = "5")]
    depth: u32,

    /// Print the node count below each root move
    #[arg(long)]
    divide: bool,

    /// Worker threads for splitting root moves
    #[arg(long, default_value = "1")]
    threads: usize,

    /// TOML suite of positions with reference counts
    #[arg(long)]
    suite: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    match &args.suite {
        Some(path) => run_suite(path, &args),
        None => run_single(&args),
    }
}

fn run_single(args: &Args) -> anyhow::Result<()> {
    let mut position = Position::from_fen(&args.fen)?;
    tracing::info!("FEN: {}", position.to_fen());

    let start = Instant::now();
    let nodes = if args.divide {
        let results = perft_divide(&mut position, args.depth);
        for (uci, count) in &results {
            println!("{}: {}", uci, count);
        }
        results.iter().map(|(_, n)| n).sum()
    } else {
        perft_parallel(&position, args.depth, args.threads)
    };
    let elapsed = start.elapsed();

    println!("Nodes: {}", nodes);
    tracing::info!(
        "depth {} in {:.3}s ({:.0} nodes/s)",
        args.depth,
        elapsed.as_secs_f64(),
        nodes as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
    );
    Ok(())
}

fn run_suite(path: &Path, args: &Args) -> anyhow::Result<()> {
    let suite = Suite::load(path)?;
    tracing::info!("Loaded {} positions from {:?}", suite.positions.len(), path);

    let mut failures = 0usize;
    for entry in &suite.positions {
        for result in suite::run_position(entry, args.depth, args.threads)? {
            if result.passed() {
                tracing::info!("{} depth {}: {}", entry.name, result.depth, result.actual);
            } else {
                failures += 1;
                tracing::error!(
                    "{} depth {}: expected {}, got {}",
                    entry.name,
                    result.depth,
                    result.expected,
                    result.actual
                );
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} perft mismatches", failures);
    }
    println!("All {} positions passed", suite.positions.len());
    Ok(())
}
