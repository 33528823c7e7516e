use itertools::Itertools;
use ndarray::Array2;
use strum::VariantArray;
use thiserror::Error;
use tracing::debug;

use crate::bounds::CostBound;
use crate::cell::{Cell, MirrorKind};
use crate::direction::Direction;
use crate::grid::Grid;
use crate::location::Location;
use crate::segment::{NodeId, Segment, SegmentTable};

/// Reasons a [`Grid`](crate::Grid) cannot be solved.
#[derive(Debug, Error)]
pub enum SolverFailure {
    /// Every visitation order and segment choice was exhausted without
    /// covering all crystals within the mirror budget.
    #[error("no mirror placement illuminates every crystal within the budget")]
    Infeasible,
}

/// One hop's exact grid and occupancy writes. Kept unchanged on the winning
/// path and retracted exactly when the branch fails.
struct Commitment {
    new_mirrors: Vec<(Location, MirrorKind)>,
    marked: Vec<Location>,
}

/// Depth-first backtracking search over the order crystals are visited,
/// choosing one segment per hop.
///
/// The grid is the solver's scratchpad: mirrors are written in place and the
/// occupancy map tracks every cell claimed by a committed hop, so at any
/// point the pair reflects exactly the path on the current recursion stack.
pub(crate) struct TourSolver<'a> {
    grid: &'a mut Grid,
    table: &'a SegmentTable,
    bound: &'a CostBound,
    occupied: Array2<bool>,
    remaining: Vec<NodeId>,
}

impl<'a> TourSolver<'a> {
    pub(crate) fn new(grid: &'a mut Grid, table: &'a SegmentTable, bound: &'a CostBound) -> Self {
        let occupied = Array2::from_elem(grid.cells.raw_dim(), false);
        let remaining = (0..grid.crystals.len()).collect_vec();
        Self { grid, table, bound, occupied, remaining }
    }

    /// Run to first success. On success the grid keeps the accepted mirror
    /// layout; on failure every tentative placement has been retracted.
    pub(crate) fn run(&mut self) -> bool {
        let entry = self.table.entry();
        let (pos, dir) = Grid::entry();
        let solved = self.search(entry, pos, dir, 0);

        if solved {
            let mirrors = self.grid.cells.iter().filter(|cell| matches!(cell, Cell::Mirror(_))).count();
            debug!(mirrors, "tour complete");
        } else {
            debug!("search space exhausted");
        }
        solved
    }

    fn search(&mut self, node: NodeId, node_pos: Location, travel: Direction, spent: usize) -> bool {
        if self.remaining.is_empty() {
            return true;
        }

        let table = self.table;
        for idx in 0..self.remaining.len() {
            let target = self.remaining[idx];
            // a dead-end crystal cannot be passed through, only ended on
            if table.is_dead_end(target) && self.remaining.len() > 1 {
                continue;
            }
            let Some(matrix) = table.segments(node, target) else { continue };
            let target_pos = self.grid.crystals[target];

            for &arrival in Direction::VARIANTS {
                for segment in matrix.get(travel, arrival) {
                    let Some(cost) = self.effective_cost(segment) else { continue };
                    let left_after = self.remaining.len() - 1;
                    if spent + cost + self.bound.bound(left_after) > self.grid.mirror_budget {
                        continue;
                    }
                    let Some(commitment) = self.commit(node_pos, travel, segment, target_pos) else {
                        continue;
                    };

                    self.remaining.remove(idx);
                    let solved = self.search(target, target_pos, arrival, spent + cost);
                    self.remaining.insert(idx, target);
                    if solved {
                        // every commitment on the winning path stays in place
                        return true;
                    }
                    self.retract(commitment);
                }
            }
        }

        false
    }

    /// Mirror placements already satisfied by the current grid are free; a
    /// cell holding the conflicting orientation invalidates the whole
    /// segment. Returns the number of mirrors this hop would newly place.
    fn effective_cost(&self, segment: &Segment) -> Option<usize> {
        let mut fresh: Vec<(Location, MirrorKind)> = Vec::new();
        for &(at, kind) in &segment.mirrors {
            match self.grid.cell(at) {
                Some(Cell::Mirror(existing)) if existing == kind => {}
                Some(Cell::Empty) => {
                    if fresh.iter().any(|&(seen, k)| seen == at && k != kind) {
                        return None;
                    }
                    if !fresh.contains(&(at, kind)) {
                        fresh.push((at, kind));
                    }
                }
                _ => return None,
            }
        }
        Some(fresh.len())
    }

    /// Geometrically trace `segment` from `start`, rejecting it on any
    /// collision with the grid bounds, blocks, previously committed beam
    /// cells, or itself (shared junctions at the start node and at reused
    /// mirrors excepted). On success the new mirrors and occupancy marks are
    /// applied and returned for exact retraction.
    fn commit(
        &mut self,
        start: Location,
        exit: Direction,
        segment: &Segment,
        target: Location,
    ) -> Option<Commitment> {
        let mut new_mirrors: Vec<(Location, MirrorKind)> = Vec::new();
        // cells the beam crosses in a straight run vs. cells it turns on; a
        // crossed cell may never reappear, a turned cell only as another turn
        let mut crossed: Vec<Location> = Vec::new();
        let mut turned: Vec<Location> = Vec::new();

        let mut pos = start;
        let mut travel = exit;
        let mut pending = segment.mirrors.iter().peekable();

        loop {
            let turns_here = pending.peek().is_some_and(|&&(at, _)| at == pos);
            if crossed.contains(&pos) || (!turns_here && turned.contains(&pos)) {
                return None;
            }

            if turns_here {
                let &(_, kind) = pending.next().expect("peeked just above");
                match self.grid.cell(pos) {
                    Some(Cell::Mirror(existing)) if existing == kind => {
                        // reused junction; already occupied, nothing to place
                    }
                    Some(Cell::Empty) if !self.occupied[pos.as_index()] => {
                        if !new_mirrors.contains(&(pos, kind)) {
                            new_mirrors.push((pos, kind));
                        }
                    }
                    _ => return None,
                }
                travel = kind.deflect(travel);
                turned.push(pos);
            } else {
                if pos == target {
                    match self.grid.cell(pos) {
                        Some(Cell::Crystal) if !self.occupied[pos.as_index()] => {}
                        _ => return None,
                    }
                } else if pos != start {
                    match self.grid.cell(pos) {
                        Some(Cell::Empty) if !self.occupied[pos.as_index()] => {}
                        _ => return None,
                    }
                }
                crossed.push(pos);
            }

            if pos == target {
                break;
            }
            pos = travel.attempt_from(pos);
        }

        for &(at, kind) in &new_mirrors {
            self.grid.place_mirror(at, kind);
        }
        let mut marked = Vec::new();
        for &at in crossed.iter().chain(turned.iter()) {
            if !self.occupied[at.as_index()] {
                self.occupied[at.as_index()] = true;
                marked.push(at);
            }
        }

        Some(Commitment { new_mirrors, marked })
    }

    fn retract(&mut self, commitment: Commitment) {
        for &(at, _) in &commitment.new_mirrors {
            self.grid.clear(at);
        }
        for &at in &commitment.marked {
            self.occupied[at.as_index()] = false;
        }
    }
}
