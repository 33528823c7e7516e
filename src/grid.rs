use std::fmt::{Display, Formatter};

use itertools::Itertools;
use ndarray::Array2;
use strum::VariantArray;
use thiserror::Error;
use tracing::debug;

use crate::bounds::CostBound;
use crate::cell::{Cell, MirrorKind};
use crate::direction::Direction;
use crate::location::Location;
use crate::segment::SegmentTable;
use crate::solver::{SolverFailure, TourSolver};

/// Reasons a textual puzzle cannot be turned into a [`Grid`].
#[derive(Debug, Error)]
pub enum ParseError {
    /// The puzzle text contained no rows at all.
    #[error("puzzle has no rows")]
    Empty,
    /// A row did not match the width established by the first row.
    #[error("row {0} does not match the width of the first row")]
    RaggedRow(usize),
    /// A character outside the five cell symbols appeared in a row.
    #[error("unknown cell symbol {0:?}")]
    UnknownSymbol(char),
}

/// A rectangular mirror-maze grid together with its mirror budget.
///
/// The grid is parsed with [`Grid::parse`] and solved by [`Grid::solve`],
/// which consumes it and yields a version annotated with placed mirrors.
/// The beam always enters at [`Grid::entry`].
#[derive(Clone)]
pub struct Grid {
    pub(crate) cells: Array2<Cell>,
    // row-major scan order; ids are stable for the whole run
    pub(crate) crystals: Vec<Location>,
    pub(crate) mirror_budget: usize,
}

impl Grid {
    /// Parse newline-separated rows of cell symbols into a grid.
    ///
    /// All rows must have the width of the first row. Crystals are recorded
    /// in row-major scan order, which fixes their ids for the whole run.
    pub fn parse(rows: &str, mirror_budget: usize) -> Result<Self, ParseError> {
        let lines = rows.lines().collect_vec();
        if lines.is_empty() {
            return Err(ParseError::Empty);
        }

        let width = lines[0].chars().count();
        let mut flat = Vec::with_capacity(lines.len() * width);
        let mut crystals = Vec::new();
        for (y, line) in lines.iter().enumerate() {
            let row = line.chars().collect_vec();
            if row.len() != width {
                return Err(ParseError::RaggedRow(y));
            }
            for (x, ch) in row.into_iter().enumerate() {
                let cell = Cell::from_char(ch).ok_or(ParseError::UnknownSymbol(ch))?;
                if cell == Cell::Crystal {
                    crystals.push(Location(x, y));
                }
                flat.push(cell);
            }
        }

        let cells = Array2::from_shape_vec((lines.len(), width), flat)
            .expect("row-major scan matches the declared shape");
        Ok(Self { cells, crystals, mirror_budget })
    }

    /// The fixed point and direction at which the beam enters the grid:
    /// column 0 of row 1, travelling right.
    pub fn entry() -> (Location, Direction) {
        (Location(0, 1), Direction::Right)
    }

    /// Grid dimensions as `(height, width)`.
    pub fn dims(&self) -> (usize, usize) {
        self.cells.dim()
    }

    /// The number of mirrors the solver may place.
    pub fn mirror_budget(&self) -> usize {
        self.mirror_budget
    }

    /// Crystal locations in scan order.
    pub fn crystals(&self) -> &[Location] {
        &self.crystals
    }

    pub(crate) fn cell(&self, location: Location) -> Option<Cell> {
        self.cells.get(location.as_index()).copied()
    }

    /// The directions whose neighboring cell is in bounds and not a block.
    pub(crate) fn open_directions(&self, location: Location) -> Vec<Direction> {
        Direction::VARIANTS
            .iter()
            .copied()
            .filter(|dir| !matches!(self.cell(dir.attempt_from(location)), None | Some(Cell::Block)))
            .collect_vec()
    }

    /// Whether a beam arriving at `location` can never continue straight
    /// through it. Such a cell is a dead end and may only be the last stop of
    /// a tour.
    pub(crate) fn is_dead_end(&self, location: Location) -> bool {
        let open = self.open_directions(location);
        match open.len() {
            0 | 1 => true,
            2 => open[1] != open[0].opposite(),
            _ => false,
        }
    }

    pub(crate) fn place_mirror(&mut self, location: Location, kind: MirrorKind) {
        self.cells[location.as_index()] = Cell::Mirror(kind);
    }

    pub(crate) fn clear(&mut self, location: Location) {
        self.cells[location.as_index()] = Cell::Empty;
    }

    /// Solves this grid: builds the segment table, then runs the backtracking
    /// tour search over it.
    ///
    /// On success the returned grid carries the accepted mirror layout; on
    /// [`SolverFailure::Infeasible`] every tentative placement has already
    /// been retracted. The first feasible assignment found is accepted, so
    /// the result is not necessarily minimum-mirror.
    pub fn solve(mut self) -> Result<Self, SolverFailure> {
        if self.crystals.is_empty() {
            debug!("no crystals to illuminate");
            return Ok(self);
        }

        let table = SegmentTable::build(&self);
        let bound = CostBound::from_table(&table, self.crystals.len());
        if TourSolver::new(&mut self, &table, &bound).run() {
            Ok(self)
        } else {
            Err(SolverFailure::Infeasible)
        }
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut out = String::with_capacity(self.cells.nrows() * (self.cells.ncols() + 1));

        for row in self.cells.rows() {
            for cell in row {
                out.push(cell.as_char());
            }
            out.push('\n');
        }

        write!(f, "{}", out)
    }
}
