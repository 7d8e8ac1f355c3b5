use crate::algorithms::common::{PathfindingAlgorithm, SearchResult};
use crate::algorithms::frontier::best_first;
use crate::environment::{manhattan, Environment};
use crate::error::SearchError;
use crate::grid::Position;

/// A* search guided by the Manhattan distance to the goal.
///
/// Every move costs at least 1, so the heuristic never overestimates and the
/// returned cost matches [`UniformCost`](super::UniformCost) on environments
/// without time-dependent obstacles.
#[derive(Debug, Default, Clone, Copy)]
pub struct AStar;

impl AStar {
    pub fn new() -> Self {
        AStar
    }
}

impl PathfindingAlgorithm for AStar {
    fn explore<E: Environment + ?Sized>(
        &mut self,
        env: &E,
        start: Position,
        goal: Position,
        time_step: u64,
    ) -> Result<SearchResult, SearchError> {
        best_first(env, start, goal, time_step, |p| manhattan(p, goal))
    }
}
