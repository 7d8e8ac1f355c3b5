use crate::algorithms::common::{PathfindingAlgorithm, SearchResult};
use crate::algorithms::frontier::best_first;
use crate::environment::Environment;
use crate::error::SearchError;
use crate::grid::Position;

/// Uniform-cost (Dijkstra) search ordered by accumulated terrain cost.
#[derive(Debug, Default, Clone, Copy)]
pub struct UniformCost;

impl UniformCost {
    pub fn new() -> Self {
        UniformCost
    }
}

impl PathfindingAlgorithm for UniformCost {
    fn explore<E: Environment + ?Sized>(
        &mut self,
        env: &E,
        start: Position,
        goal: Position,
        time_step: u64,
    ) -> Result<SearchResult, SearchError> {
        best_first(env, start, goal, time_step, |_| 0)
    }
}
