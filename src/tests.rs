#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::bounds::CostBound;
    use crate::cell::Cell;
    use crate::grid::{Grid, ParseError};
    use crate::location::Location;
    use crate::segment::SegmentTable;
    use crate::solver::SolverFailure;

    fn mirror_count(grid: &Grid) -> usize {
        grid.to_string().chars().filter(|ch| matches!(ch, '/' | '\\')).count()
    }

    /// Trace the beam across the grid: deflect on mirrors, stop on a block
    /// or the grid edge. Returns the cells in visit order.
    fn beam_visits(grid: &Grid) -> Vec<Location> {
        let (mut pos, mut dir) = Grid::entry();
        let (height, width) = grid.dims();
        let mut visited = Vec::new();

        // placed mirrors can cycle the beam after the last crystal, so cap it
        for _ in 0..(4 * height * width) {
            match grid.cell(pos) {
                None | Some(Cell::Block) => break,
                Some(Cell::Mirror(kind)) => dir = kind.deflect(dir),
                _ => {}
            }
            visited.push(pos);
            pos = dir.attempt_from(pos);
        }
        visited
    }

    /// Assert the solved beam collects every crystal exactly once without
    /// crossing its own path anywhere but at mirror junctions.
    fn assert_lights_all(solved: &Grid) {
        let visited = beam_visits(solved);
        let crystals = solved.crystals();

        let mut collected = HashSet::new();
        let mut done_at = None;
        for (step, pos) in visited.iter().enumerate() {
            if crystals.contains(pos) {
                collected.insert(*pos);
                if collected.len() == crystals.len() {
                    done_at = Some(step);
                    break;
                }
            }
        }
        let done_at = done_at.expect("beam reaches every crystal");

        let prefix = &visited[..=done_at];
        for pos in prefix {
            let visits = prefix.iter().filter(|other| *other == pos).count();
            match solved.cell(*pos) {
                Some(Cell::Crystal) => assert_eq!(visits, 1, "crystal at {pos:?} revisited"),
                // a reused mirror is a legitimate junction for two passes
                Some(Cell::Mirror(_)) => assert!(visits <= 2, "mirror at {pos:?} overused"),
                _ => assert_eq!(visits, 1, "beam crosses itself at {pos:?}"),
            }
        }
    }

    #[test]
    fn parse_round_trips_through_display() {
        let text = "#* /\n\\   \n    \n";
        let grid = Grid::parse(text, 3).unwrap();

        assert_eq!(format!("{}", grid), text);
        assert_eq!(grid.dims(), (3, 4));
        assert_eq!(grid.crystals(), &[Location(1, 0)]);
    }

    #[test]
    fn parse_rejects_ragged_rows() {
        assert!(matches!(Grid::parse("   \n  \n", 0), Err(ParseError::RaggedRow(1))));
    }

    #[test]
    fn parse_rejects_unknown_symbols() {
        assert!(matches!(Grid::parse(" x \n   \n", 0), Err(ParseError::UnknownSymbol('x'))));
    }

    #[test]
    fn zero_crystals_solve_immediately() {
        let solved = Grid::parse("     \n     \n", 5).unwrap().solve().unwrap();

        assert_eq!(format!("{}", solved), "     \n     \n");
        assert_eq!(mirror_count(&solved), 0);
    }

    #[test]
    fn zig_zag_places_a_single_mirror() {
        // two crystals reachable from the entry with one 45° turn
        let grid = Grid::parse("   * \n  *  \n     ", 2).unwrap();
        let solved = grid.solve().unwrap();

        assert_eq!(format!("{}", solved), "   * \n  */ \n     \n");
        assert_eq!(mirror_count(&solved), 1);
        assert_lights_all(&solved);
    }

    #[test]
    fn zero_budget_is_infeasible() {
        // the same layout needs at least one turn, so a zero budget exhausts
        let grid = Grid::parse("   * \n  *  \n     ", 0).unwrap();

        assert!(matches!(grid.solve(), Err(SolverFailure::Infeasible)));
    }

    #[test]
    fn dead_end_crystal_is_visited_last() {
        // the crystal at (4, 1) is walled in above and below; the tour must
        // route through (2, 0) first and end on it
        let grid = Grid::parse("  * #\n    *\n    #", 4).unwrap();
        let solved = grid.solve().unwrap();

        assert_eq!(format!("{}", solved), " /*\\#\n / \\*\n    #\n");
        assert_eq!(mirror_count(&solved), 4);
        assert_lights_all(&solved);
    }

    #[test]
    fn three_crystals_stay_within_budget() {
        let grid = Grid::parse("     \n  *  \n *   \n    *\n     ", 6).unwrap();
        let budget = grid.mirror_budget();
        let solved = grid.solve().unwrap();

        assert!(mirror_count(&solved) <= budget);
        assert_lights_all(&solved);
    }

    #[test]
    fn lower_bound_prefix_is_monotonic() {
        let grid = Grid::parse("     \n  *  \n *   \n    *\n     ", 6).unwrap();
        let table = SegmentTable::build(&grid);
        let bound = CostBound::from_table(&table, grid.crystals().len());

        assert_eq!(bound.bound(0), 0);
        for remaining in 0..grid.crystals().len() {
            assert!(bound.bound(remaining) <= bound.bound(remaining + 1));
        }
    }

    #[test]
    fn segment_table_build_is_idempotent() {
        let grid = Grid::parse("  * #\n    *\n    #", 4).unwrap();
        let first = SegmentTable::build(&grid);
        let second = SegmentTable::build(&grid);

        let nodes = grid.crystals().len() + 1;
        for from in 0..nodes {
            for to in 0..grid.crystals().len() {
                assert_eq!(first.segments(from, to), second.segments(from, to));
            }
        }
    }
}
