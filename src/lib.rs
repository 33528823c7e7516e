#![warn(missing_docs)]

//! # `heliograph`
//!
//! A solver for mirror-maze crystal puzzles: a light beam enters a rectangular
//! grid at a fixed point and direction, and the solver places 45°/135° mirrors
//! on blank cells so the beam passes through every crystal exactly once within
//! a mirror budget, never touching a block and never crossing its own path.
//! Begin by parsing a [`Grid`] with [`Grid::parse`], then call
//! [`solve()`](Grid::solve), consuming the grid and yielding a version
//! annotated with the accepted mirrors.
//!
//! # Internals
//! Solving runs in two stages.
//!
//! First, a per-source uniform-cost search enumerates minimal beam segments
//! between every pair of crystals (plus the entry point), keyed by the
//! direction the beam leaves the source and the direction it arrives at the
//! target. Cost counts mirrors; straight travel is free. Crystals absorb the
//! beam, so no segment passes through an intermediate crystal, and all minimal
//! alternatives are kept because a later collision may rule out the globally
//! cheapest one.
//!
//! Second, a depth-first backtracking search picks the order crystals are
//! visited and one segment per hop, reusing mirrors already on the grid where
//! the orientations agree, pruning against an additive lower bound over the
//! cheapest node pairs, and tracing each candidate geometrically so committed
//! paths never cross. The first complete assignment under the budget is
//! accepted, so the result is feasible rather than minimum-mirror.

pub use cell::{Cell, MirrorKind};
pub use direction::Direction;
pub use grid::{Grid, ParseError};
pub use location::Location;
pub use solver::SolverFailure;

pub(crate) mod bounds;
pub(crate) mod cell;
pub(crate) mod direction;
pub(crate) mod grid;
pub(crate) mod location;
pub(crate) mod segment;
pub(crate) mod solver;
mod tests;
