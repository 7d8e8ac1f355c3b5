//! Route search over time-dependent grid environments.
//!
//! Four strategies share the [`Environment`] trait and return a
//! [`SearchResult`]:
//!
//! - [`BreadthFirst`]: fewest moves
//! - [`UniformCost`]: cheapest route
//! - [`AStar`]: cheapest route, guided by Manhattan distance
//! - [`HillClimbing`]: fast randomized walk with restarts, no guarantees
//!
//! [`search`] picks one by [`Algorithm`].

pub mod a_star;
pub mod bfs;
pub mod common;
mod frontier;
pub mod hill_climbing;
pub mod uniform_cost;

pub use a_star::AStar;
pub use bfs::BreadthFirst;
pub use common::{path_cost, PathfindingAlgorithm, SearchResult};
pub use hill_climbing::HillClimbing;
pub use uniform_cost::UniformCost;

use crate::environment::Environment;
use crate::error::{ParseAlgorithmError, SearchError};
use crate::grid::Position;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    BreadthFirst,
    UniformCost,
    BestFirst,
    LocalSearch,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::BreadthFirst,
        Algorithm::UniformCost,
        Algorithm::BestFirst,
        Algorithm::LocalSearch,
    ];

    /// Short name used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::BreadthFirst => "bfs",
            Algorithm::UniformCost => "ucs",
            Algorithm::BestFirst => "astar",
            Algorithm::LocalSearch => "hillclimb",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bfs" | "breadth_first" => Ok(Algorithm::BreadthFirst),
            "ucs" | "uniform_cost" => Ok(Algorithm::UniformCost),
            "astar" | "a_star" | "best_first" => Ok(Algorithm::BestFirst),
            "hillclimb" | "hill_climbing" | "local_search" => Ok(Algorithm::LocalSearch),
            _ => Err(ParseAlgorithmError(s.to_string())),
        }
    }
}

/// Budget and randomness for [`Algorithm::LocalSearch`]; ignored by the
/// other algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub max_restarts: usize,
    pub max_steps: usize,
    /// Seed for the local search RNG. `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            max_restarts: 10,
            max_steps: 100,
            seed: None,
        }
    }
}

/// Runs `algorithm` from `start` to `goal`, departing at simulated
/// `time_step`.
pub fn search<E: Environment + ?Sized>(
    env: &E,
    algorithm: Algorithm,
    start: Position,
    goal: Position,
    time_step: u64,
    options: &SearchOptions,
) -> Result<SearchResult, SearchError> {
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    search_with_rng(env, algorithm, start, goal, time_step, options, &mut rng)
}

/// Like [`search`], drawing local search randomness from `rng`.
pub fn search_with_rng<E: Environment + ?Sized, R: Rng>(
    env: &E,
    algorithm: Algorithm,
    start: Position,
    goal: Position,
    time_step: u64,
    options: &SearchOptions,
    rng: &mut R,
) -> Result<SearchResult, SearchError> {
    let result = match algorithm {
        Algorithm::BreadthFirst => BreadthFirst.search(env, start, goal, time_step),
        Algorithm::UniformCost => UniformCost.search(env, start, goal, time_step),
        Algorithm::BestFirst => AStar.search(env, start, goal, time_step),
        Algorithm::LocalSearch => {
            HillClimbing::new(options.max_restarts, options.max_steps, rng)
                .search(env, start, goal, time_step)
        }
    }?;

    info!(
        "{} from {} to {} at t={}: success={} cost={:?} expanded={} in {:.2?}",
        algorithm,
        start,
        goal,
        time_step,
        result.success,
        result.cost,
        result.nodes_expanded,
        result.elapsed
    );
    Ok(result)
}
