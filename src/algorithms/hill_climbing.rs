use crate::algorithms::common::{path_cost, PathfindingAlgorithm, SearchResult};
use crate::environment::{manhattan, Environment};
use crate::error::SearchError;
use crate::grid::Position;
use log::{debug, trace};
use rand::Rng;

/// Score added to a neighbor that is among the last few cells of the path.
pub const RECENCY_PENALTY: u64 = 10;
/// How many trailing path cells count as recent, and how far a restart may
/// backtrack.
pub const RECENT_WINDOW: usize = 3;
/// Chance of giving up an attempt on a plateau instead of pushing through.
pub const STUCK_PROBABILITY: f64 = 0.8;

enum Climb {
    Reached,
    Stuck,
}

/// Greedy local search with random restarts.
///
/// Each step moves to the neighbor with the lowest
/// `manhattan(n, goal) + move cost` (plus [`RECENCY_PENALTY`] for recently
/// visited cells). When that score is no better than
/// `manhattan(current, goal) + cost so far` the walk stops with probability
/// [`STUCK_PROBABILITY`]. A stuck walk restarts from a random cell among the
/// last [`RECENT_WINDOW`] steps of its path.
///
/// This is a best-effort walk: it is neither optimal nor complete, and can
/// report failure on goals the graph searches reach.
#[derive(Debug, Clone)]
pub struct HillClimbing<R> {
    max_restarts: usize,
    max_steps: usize,
    rng: R,
}

impl<R: Rng> HillClimbing<R> {
    /// Both limits are clamped to at least 1.
    pub fn new(max_restarts: usize, max_steps: usize, rng: R) -> Self {
        HillClimbing {
            max_restarts: max_restarts.max(1),
            max_steps: max_steps.max(1),
            rng,
        }
    }

    /// Walks from the end of `path` for up to `max_steps` moves.
    fn climb<E: Environment + ?Sized>(
        &mut self,
        env: &E,
        goal: Position,
        time_step: u64,
        path: &mut Vec<Position>,
        cost: &mut u64,
        nodes_expanded: &mut usize,
    ) -> Climb {
        for _ in 0..self.max_steps {
            let Some(&current) = path.last() else {
                return Climb::Stuck;
            };
            if current == goal {
                return Climb::Reached;
            }

            let neighbors = env.neighbors(current, time_step + path.len() as u64);
            *nodes_expanded += 1;

            let recent = &path[path.len().saturating_sub(RECENT_WINDOW)..];
            let Some((next, step_cost, score)) = neighbors
                .into_iter()
                .map(|(n, c)| {
                    let penalty = if recent.contains(&n) { RECENCY_PENALTY } else { 0 };
                    (n, c, manhattan(n, goal) + u64::from(c) + penalty)
                })
                .min_by_key(|&(_, _, score)| score)
            else {
                trace!("no passable neighbor at {}", current);
                return Climb::Stuck;
            };

            if score >= manhattan(current, goal) + *cost && self.rng.gen_bool(STUCK_PROBABILITY) {
                trace!("local optimum at {} (score {})", current, score);
                return Climb::Stuck;
            }

            path.push(next);
            *cost += u64::from(step_cost);
        }

        if path.last() == Some(&goal) {
            Climb::Reached
        } else {
            Climb::Stuck
        }
    }

    /// Drops up to [`RECENT_WINDOW`] trailing steps, chosen uniformly, and
    /// recomputes the cost of what remains.
    fn backtrack<E: Environment + ?Sized>(
        &mut self,
        env: &E,
        path: &mut Vec<Position>,
        cost: &mut u64,
    ) -> Result<(), SearchError> {
        let window = RECENT_WINDOW.min(path.len().saturating_sub(1));
        if window == 0 {
            return Ok(());
        }
        let back = self.rng.gen_range(1..=window);
        path.truncate(path.len() - back);
        *cost = path_cost(env, path)?;
        Ok(())
    }
}

impl<R: Rng> PathfindingAlgorithm for HillClimbing<R> {
    fn explore<E: Environment + ?Sized>(
        &mut self,
        env: &E,
        start: Position,
        goal: Position,
        time_step: u64,
    ) -> Result<SearchResult, SearchError> {
        let mut nodes_expanded = 0;
        let mut path = vec![start];
        let mut cost = 0u64;

        for attempt in 0..self.max_restarts {
            match self.climb(env, goal, time_step, &mut path, &mut cost, &mut nodes_expanded) {
                Climb::Reached => {
                    debug!("hill climbing reached goal on attempt {}", attempt + 1);
                    return Ok(SearchResult::found(path, cost, nodes_expanded));
                }
                Climb::Stuck => {
                    if attempt + 1 < self.max_restarts {
                        self.backtrack(env, &mut path, &mut cost)?;
                        debug!(
                            "hill climbing attempt {} stuck, restarting from {:?}",
                            attempt + 1,
                            path.last()
                        );
                    }
                }
            }
        }

        Ok(SearchResult::unreachable(nodes_expanded))
    }
}
