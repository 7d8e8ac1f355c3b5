use crate::environment::Environment;
use crate::error::SearchError;
use crate::grid::{Grid, Position};
use log::debug;
use rustc_hash::FxHashSet;

/// Delivery agent walking a grid one tick at a time.
pub struct Agent {
    pub position: Position,
    pub time: u64,
    pub total_cost: u64,
    pub field_of_view: usize,
    pub known_obstacles: FxHashSet<Position>,
    pub path: Vec<Position>,
    pub log: Vec<String>,
}

impl Agent {
    pub fn new(start: Position, time: u64, field_of_view: usize) -> Self {
        Agent {
            position: start,
            time,
            total_cost: 0,
            field_of_view,
            known_obstacles: FxHashSet::default(),
            path: vec![start],
            log: Vec::new(),
        }
    }

    /// Replaces known obstacles with the dynamic obstacles currently within
    /// the field of view. Walls are always known and not tracked here.
    pub fn observe(&mut self, grid: &Grid) {
        let (min_r, max_r, min_c, max_c) = self.field_of_view_bounds(grid);
        self.known_obstacles = grid
            .obstacle_positions(self.time)
            .into_iter()
            .filter(|p| (min_r..=max_r).contains(&p.row) && (min_c..=max_c).contains(&p.col))
            .collect();
    }

    /// Steps onto `next`, paying its terrain cost and advancing the clock.
    pub fn move_to(&mut self, grid: &Grid, next: Position) -> Result<(), SearchError> {
        self.total_cost += u64::from(grid.cost(next)?);
        self.position = next;
        self.time += 1;
        self.path.push(next);
        Ok(())
    }

    pub fn wait(&mut self) {
        self.time += 1;
        self.path.push(self.position);
    }

    pub fn record(&mut self, message: String) {
        debug!("t={} {}", self.time, message);
        self.log.push(format!("t={}: {}", self.time, message));
    }

    /// Inclusive `(min_row, max_row, min_col, max_col)` of the visible area.
    pub fn field_of_view_bounds(&self, grid: &Grid) -> (usize, usize, usize, usize) {
        let min_r = self.position.row.saturating_sub(self.field_of_view);
        let max_r = (self.position.row + self.field_of_view).min(grid.rows.saturating_sub(1));
        let min_c = self.position.col.saturating_sub(self.field_of_view);
        let max_c = (self.position.col + self.field_of_view).min(grid.cols.saturating_sub(1));
        (min_r, max_r, min_c, max_c)
    }
}

/// What an agent believes about the grid: walls and terrain are known, and
/// dynamic obstacles it has seen are assumed to stay where they are.
pub struct ObservedGrid<'a> {
    grid: &'a Grid,
    obstacles: &'a FxHashSet<Position>,
}

impl<'a> ObservedGrid<'a> {
    pub fn new(grid: &'a Grid, obstacles: &'a FxHashSet<Position>) -> Self {
        ObservedGrid { grid, obstacles }
    }
}

impl Environment for ObservedGrid<'_> {
    fn dimensions(&self) -> (usize, usize) {
        self.grid.dimensions()
    }

    fn cost(&self, pos: Position) -> Result<u32, SearchError> {
        self.grid.cost(pos)
    }

    fn neighbors(&self, pos: Position, _time: u64) -> Vec<(Position, u32)> {
        self.grid
            .open_neighbors(pos, |p| self.grid.is_wall(p) || self.obstacles.contains(&p))
    }
}
