use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use itertools::Itertools;
use tracing_subscriber::fmt::SubscriberBuilder;

use heliograph::Grid;

/// Solve a mirror-maze crystal puzzle.
///
/// Input carries a `height width` line, a mirror-budget line, then the grid
/// rows; the solved grid is printed back in the same format. When the puzzle
/// is infeasible the grid is printed back unchanged.
#[derive(Parser)]
#[command(name = "heliograph")]
struct Cmd {
    /// Puzzle file; read from stdin when omitted.
    input: Option<PathBuf>,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();

    let raw = match &cmd.input {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
        }
        None => io::read_to_string(io::stdin()).context("reading stdin")?,
    };

    let (height, width, budget, rows) = read_puzzle(&raw)?;
    let grid = Grid::parse(&rows, budget)?;
    if grid.dims() != (height, width) {
        bail!("grid rows do not match the declared {}x{} dimensions", height, width);
    }

    tracing::info!(crystals = grid.crystals().len(), budget, "solving");
    let solved = match grid.clone().solve() {
        Ok(solved) => solved,
        Err(failure) => {
            tracing::warn!(%failure, "printing the grid unchanged");
            grid
        }
    };

    println!("{} {}", height, width);
    println!("{}", budget);
    print!("{}", solved);
    Ok(())
}

/// Split raw puzzle text into dimensions, mirror budget, and the grid rows.
/// Rows shorter than the declared width are right-padded with blanks, since
/// trailing spaces rarely survive editors.
fn read_puzzle(raw: &str) -> Result<(usize, usize, usize, String)> {
    let mut lines = raw.lines();

    let header = lines.next().context("missing dimension line")?;
    let (height, width) = header
        .split_whitespace()
        .collect_tuple()
        .context("dimension line must be `height width`")?;
    let height: usize = height.parse().context("bad height")?;
    let width: usize = width.parse().context("bad width")?;
    let budget: usize = lines
        .next()
        .context("missing mirror budget line")?
        .trim()
        .parse()
        .context("bad mirror budget")?;

    let rows = lines.take(height).map(|line| format!("{line:<width$}")).join("\n");
    Ok((height, width, budget, rows))
}
