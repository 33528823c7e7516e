use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use petgraph::graphmap::DiGraphMap;
use tracing::debug;

use crate::cell::{Cell, MirrorKind};
use crate::direction::Direction;
use crate::grid::Grid;
use crate::location::Location;

/// Index of a tour node: crystals in scan order, then the entry sentinel.
pub(crate) type NodeId = usize;

/// A candidate beam path between two nodes for one (exit, arrival) direction
/// pair. The path is fully determined by its endpoints, the exit direction
/// and the mirrors it requires, so only the mirrors are stored.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Segment {
    /// Mirror placements the path requires, in travel order.
    pub(crate) mirrors: Vec<(Location, MirrorKind)>,
}

impl Segment {
    /// Mirror cost of the segment before any reuse accounting.
    pub(crate) fn cost(&self) -> usize {
        self.mirrors.len()
    }
}

/// Segment lists keyed by the direction the beam leaves the source and the
/// direction it arrives at the target, cheapest first.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct SegmentMatrix([[Vec<Segment>; 4]; 4]);

impl SegmentMatrix {
    pub(crate) fn get(&self, exit: Direction, arrival: Direction) -> &[Segment] {
        &self.0[exit as usize][arrival as usize]
    }

    fn push(&mut self, exit: Direction, arrival: Direction, segment: Segment) {
        self.0[exit as usize][arrival as usize].push(segment);
    }

    fn count(&self) -> usize {
        self.0.iter().flatten().map(Vec::len).sum()
    }

    pub(crate) fn min_cost(&self) -> Option<usize> {
        self.0.iter().flatten().flat_map(|list| list.iter()).map(Segment::cost).min()
    }
}

/// All minimal beam segments between pairs of nodes, built once per solve and
/// read-only afterwards.
///
/// Stored as a directed graph over node ids; an edge (source, target) carries
/// the [`SegmentMatrix`] of every way the beam can get from source to target
/// within the mirror budget. Dead-end flags for each crystal fall out of the
/// same open-direction enumeration.
pub(crate) struct SegmentTable {
    graph: DiGraphMap<NodeId, SegmentMatrix>,
    dead_ends: Vec<bool>,
    entry: NodeId,
}

impl SegmentTable {
    /// Run the per-(node, exit direction) uniform-cost searches over `grid`.
    pub(crate) fn build(grid: &Grid) -> Self {
        let entry = grid.crystals.len();
        let mut graph: DiGraphMap<NodeId, SegmentMatrix> = DiGraphMap::new();
        for id in 0..=entry {
            graph.add_node(id);
        }

        let mut dead_ends = Vec::with_capacity(entry);
        for source in 0..=entry {
            let mut found: HashMap<NodeId, SegmentMatrix> = HashMap::new();

            if source == entry {
                let (pos, dir) = Grid::entry();
                // the entry cell itself may host a mirror, so the search
                // starts on it rather than one step past it
                explore(grid, None, dir, (pos, dir), &mut found);
            } else {
                let pos = grid.crystals[source];
                dead_ends.push(grid.is_dead_end(pos));
                // crystals cannot host mirrors; the beam leaves them straight,
                // so each search starts one step off the crystal
                for dir in grid.open_directions(pos) {
                    explore(grid, Some(pos), dir, (dir.attempt_from(pos), dir), &mut found);
                }
            }

            for (target, matrix) in found {
                graph.add_edge(source, target, matrix);
            }
        }

        let segments: usize = graph.all_edges().map(|(_, _, matrix)| matrix.count()).sum();
        debug!(nodes = entry + 1, segments, "segment table built");

        Self { graph, dead_ends, entry }
    }

    /// Id of the entry sentinel node.
    pub(crate) fn entry(&self) -> NodeId {
        self.entry
    }

    /// Whether the crystal `id` may only be the final stop of a tour.
    pub(crate) fn is_dead_end(&self, id: NodeId) -> bool {
        self.dead_ends[id]
    }

    pub(crate) fn segments(&self, from: NodeId, to: NodeId) -> Option<&SegmentMatrix> {
        self.graph.edge_weight(from, to)
    }

    pub(crate) fn all_pairs(&self) -> impl Iterator<Item = (NodeId, NodeId, &SegmentMatrix)> {
        self.graph.all_edges()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct Candidate {
    cost: usize,
    // insertion counter; keeps equal-cost exploration deterministic
    seq: usize,
    at: Location,
    travel: Direction,
    mirrors: Vec<(Location, MirrorKind)>,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse for cheapest-first, FIFO on ties
        other.cost.cmp(&self.cost).then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Ascending-cost search over (position, travel direction) states from one
/// (node, exit direction) pair, recording a segment for every crystal arrival
/// within the mirror budget.
///
/// Crystals absorb the beam: a state on a crystal cell is recorded but never
/// expanded, and crystal arrivals bypass the best-cost filter so the table
/// keeps an entry per arrival direction.
fn explore(
    grid: &Grid,
    source: Option<Location>,
    exit: Direction,
    start: (Location, Direction),
    found: &mut HashMap<NodeId, SegmentMatrix>,
) {
    if matches!(grid.cell(start.0), None | Some(Cell::Block)) {
        return;
    }

    let budget = grid.mirror_budget;
    let mut best: HashMap<(Location, Direction), usize> = HashMap::new();
    let mut heap = BinaryHeap::new();
    let mut seq = 0usize;

    if grid.cell(start.0) != Some(Cell::Crystal) {
        best.insert(start, 0);
    }
    heap.push(Candidate { cost: 0, seq, at: start.0, travel: start.1, mirrors: Vec::new() });

    while let Some(Candidate { cost, at, travel, mirrors, .. }) = heap.pop() {
        if grid.cell(at) == Some(Cell::Crystal) {
            if source != Some(at) {
                let target = grid
                    .crystals
                    .iter()
                    .position(|crystal| *crystal == at)
                    .expect("every crystal cell is indexed");
                found.entry(target).or_default().push(exit, travel, Segment { mirrors });
            }
            continue;
        }

        if best.get(&(at, travel)).is_some_and(|&prior| prior < cost) {
            // a cheaper route got here since this state was queued
            continue;
        }

        for next in grid.open_directions(at) {
            if next == travel.opposite() {
                continue;
            }

            let (cost, mirrors) = if next == travel {
                (cost, mirrors.clone())
            } else {
                let mut with_turn = mirrors.clone();
                with_turn.push((at, MirrorKind::between(travel, next)));
                (cost + 1, with_turn)
            };
            if cost > budget {
                continue;
            }

            let to = next.attempt_from(at);
            if grid.cell(to) != Some(Cell::Crystal) {
                if best.get(&(to, next)).is_some_and(|&prior| prior <= cost) {
                    continue;
                }
                best.insert((to, next), cost);
            }

            seq += 1;
            heap.push(Candidate { cost, seq, at: to, travel: next, mirrors });
        }
    }
}
