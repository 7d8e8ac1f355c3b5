use crate::environment::Environment;
use crate::error::SearchError;
use crate::grid::Position;
use rustc_hash::FxHashMap;
use std::time::{Duration, Instant};

/// Outcome of a single search.
///
/// `success` is true exactly when `path` ends at the goal, and `cost` is
/// `None` exactly when `success` is false.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub path: Vec<Position>,
    pub cost: Option<u64>,
    pub nodes_expanded: usize,
    pub elapsed: Duration,
    pub success: bool,
}

impl SearchResult {
    pub fn found(path: Vec<Position>, cost: u64, nodes_expanded: usize) -> Self {
        SearchResult {
            path,
            cost: Some(cost),
            nodes_expanded,
            elapsed: Duration::ZERO,
            success: true,
        }
    }

    pub fn unreachable(nodes_expanded: usize) -> Self {
        SearchResult {
            path: Vec::new(),
            cost: None,
            nodes_expanded,
            elapsed: Duration::ZERO,
            success: false,
        }
    }

    /// Number of moves along the path.
    pub fn moves(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Wall-clock time is excluded so that repeated searches compare equal.
impl PartialEq for SearchResult {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
            && self.cost == other.cost
            && self.nodes_expanded == other.nodes_expanded
            && self.success == other.success
    }
}

impl Eq for SearchResult {}

pub trait PathfindingAlgorithm {
    /// Runs the algorithm proper. Callers go through [`search`], which has
    /// already validated both endpoints and handled `start == goal`.
    ///
    /// [`search`]: PathfindingAlgorithm::search
    fn explore<E: Environment + ?Sized>(
        &mut self,
        env: &E,
        start: Position,
        goal: Position,
        time_step: u64,
    ) -> Result<SearchResult, SearchError>;

    /// Finds a route from `start` to `goal`, departing at simulated
    /// `time_step`.
    ///
    /// Fails with `OutOfBounds` before any search work if either endpoint lies
    /// outside the environment.
    fn search<E: Environment + ?Sized>(
        &mut self,
        env: &E,
        start: Position,
        goal: Position,
        time_step: u64,
    ) -> Result<SearchResult, SearchError> {
        env.check_bounds(start)?;
        env.check_bounds(goal)?;

        let started = Instant::now();
        let mut result = if start == goal {
            SearchResult::found(vec![start], 0, 0)
        } else {
            self.explore(env, start, goal, time_step)?
        };
        result.elapsed = started.elapsed();
        Ok(result)
    }
}

/// Sum of terrain costs of every cell after the first.
pub fn path_cost<E: Environment + ?Sized>(env: &E, path: &[Position]) -> Result<u64, SearchError> {
    path.iter()
        .skip(1)
        .try_fold(0u64, |total, &pos| Ok(total + u64::from(env.cost(pos)?)))
}

/// Walks parent links back from `goal` to the root.
pub(crate) fn reconstruct_path(
    parents: &FxHashMap<Position, Position>,
    goal: Position,
) -> Vec<Position> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&parent) = parents.get(&current) {
        path.push(parent);
        current = parent;
    }
    path.reverse();
    path
}
