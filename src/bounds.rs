use std::collections::HashMap;

use itertools::Itertools;
use unordered_pair::UnorderedPair;

use crate::segment::{NodeId, SegmentTable};

/// An additive, direction-independent lower bound on the mirrors still needed
/// to reach a given number of crystals.
///
/// One scalar per unordered node pair (the cheapest segment over both
/// orientations and all direction combinations); `bound(r)` sums the `r`
/// smallest. That uses global minima rather than costs actually reachable
/// from the current position, so it never overestimates and is safe to prune
/// with.
pub(crate) struct CostBound {
    prefix: Vec<usize>,
}

impl CostBound {
    pub(crate) fn from_table(table: &SegmentTable, crystals: usize) -> Self {
        let mut cheapest: HashMap<UnorderedPair<NodeId>, usize> = HashMap::new();
        for (from, to, matrix) in table.all_pairs() {
            let Some(min) = matrix.min_cost() else { continue };
            cheapest
                .entry(UnorderedPair::from((from, to)))
                .and_modify(|prior| *prior = (*prior).min(min))
                .or_insert(min);
        }

        let mut prefix = Vec::with_capacity(crystals + 1);
        prefix.push(0);
        for cost in cheapest.into_values().sorted_unstable().take(crystals) {
            let base = *prefix.last().expect("seeded with zero");
            prefix.push(base + cost);
        }

        Self { prefix }
    }

    /// Lower bound on the additional mirror cost of connecting `remaining`
    /// more crystals.
    pub(crate) fn bound(&self, remaining: usize) -> usize {
        // fewer reachable pairs than remaining hops means those branches die
        // on lookup failure anyway; clamping stays admissible
        self.prefix[remaining.min(self.prefix.len() - 1)]
    }
}
