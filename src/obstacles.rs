use crate::environment::Environment;
use crate::grid::{Grid, Position};
use rand::seq::SliceRandom;
use rand::Rng;

/// An obstacle that cycles along a fixed route.
///
/// Inactive before `start_time`; afterwards it advances one route cell every
/// `speed` ticks and wraps around at the end of the route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovingObstacle {
    path: Vec<Position>,
    speed: u64,
    start_time: u64,
}

impl MovingObstacle {
    /// `speed` is clamped to at least 1 tick per cell.
    pub fn new(path: Vec<Position>, speed: u64, start_time: u64) -> Self {
        MovingObstacle {
            path,
            speed: speed.max(1),
            start_time,
        }
    }

    /// Builds an obstacle from a random walk of up to `path_length` cells,
    /// avoiding walls, the grid start and goal, and revisits where possible.
    /// Returns `None` when there is no free cell to spawn on.
    pub fn random<R: Rng>(
        grid: &Grid,
        rng: &mut R,
        path_length: usize,
        speed: u64,
        start_time: u64,
    ) -> Option<Self> {
        let free: Vec<Position> = (0..grid.rows)
            .flat_map(|r| (0..grid.cols).map(move |c| Position::new(r, c)))
            .filter(|&p| !grid.is_wall(p) && p != grid.start && p != grid.goal)
            .collect();
        let &spawn = free.choose(rng)?;

        let mut path = vec![spawn];
        let mut current = spawn;
        for _ in 1..path_length {
            let neighbors: Vec<Position> = grid
                .neighbors(current, 0)
                .into_iter()
                .map(|(p, _)| p)
                .collect();
            if neighbors.is_empty() {
                break;
            }
            let fresh: Vec<Position> = neighbors
                .iter()
                .copied()
                .filter(|p| *p != grid.start && *p != grid.goal && !path.contains(p))
                .collect();
            let pool = if fresh.is_empty() { &neighbors } else { &fresh };
            let Some(&next) = pool.choose(rng) else {
                break;
            };
            path.push(next);
            current = next;
        }

        Some(MovingObstacle::new(path, speed, start_time))
    }

    pub fn path(&self) -> &[Position] {
        &self.path
    }

    /// Cell occupied at `time`, if the obstacle is active.
    pub fn position_at(&self, time: u64) -> Option<Position> {
        if time < self.start_time || self.path.is_empty() {
            return None;
        }
        let step = (time - self.start_time) / self.speed;
        let index = (step % self.path.len() as u64) as usize;
        Some(self.path[index])
    }
}
