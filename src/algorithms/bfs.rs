use crate::algorithms::common::{path_cost, reconstruct_path, PathfindingAlgorithm, SearchResult};
use crate::environment::Environment;
use crate::error::SearchError;
use crate::grid::Position;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

/// Breadth-first search: fewest moves, not necessarily lowest cost.
///
/// A cell is marked visited when first enqueued and is never reconsidered,
/// even if arriving later would avoid an obstacle that blocked the first
/// arrival. Waiting in place is not modelled either.
#[derive(Debug, Default, Clone, Copy)]
pub struct BreadthFirst;

impl BreadthFirst {
    pub fn new() -> Self {
        BreadthFirst
    }
}

impl PathfindingAlgorithm for BreadthFirst {
    fn explore<E: Environment + ?Sized>(
        &mut self,
        env: &E,
        start: Position,
        goal: Position,
        time_step: u64,
    ) -> Result<SearchResult, SearchError> {
        let mut frontier = VecDeque::from([(start, 0u64)]);
        let mut visited: FxHashSet<Position> = FxHashSet::default();
        let mut parents: FxHashMap<Position, Position> = FxHashMap::default();
        let mut nodes_expanded = 0;
        visited.insert(start);

        while let Some((current, depth)) = frontier.pop_front() {
            nodes_expanded += 1;

            if current == goal {
                let path = reconstruct_path(&parents, goal);
                // Fewest moves does not imply cheapest under varying terrain.
                let cost = path_cost(env, &path)?;
                return Ok(SearchResult::found(path, cost, nodes_expanded));
            }

            for (next, _) in env.neighbors(current, time_step + depth + 1) {
                if visited.insert(next) {
                    parents.insert(next, current);
                    frontier.push_back((next, depth + 1));
                }
            }
        }

        Ok(SearchResult::unreachable(nodes_expanded))
    }
}
