use crate::environment::Environment;
use crate::error::{MapError, SearchError};
use crate::obstacles::MovingObstacle;
use rand::Rng;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Open { cost: u32 },
    Wall,
}

/// Grid world with terrain costs, static walls and time-dependent obstacles.
#[derive(Debug, Clone)]
pub struct Grid {
    pub rows: usize,
    pub cols: usize,
    cells: Vec<Vec<Cell>>,
    pub start: Position,
    pub goal: Position,
    scheduled: FxHashMap<u64, FxHashSet<Position>>,
    moving: Vec<MovingObstacle>,
}

impl Grid {
    /// Open grid with unit terrain cost, start in the top-left corner and goal
    /// in the bottom-right one.
    pub fn new(rows: usize, cols: usize) -> Self {
        Grid {
            rows,
            cols,
            cells: vec![vec![Cell::Open { cost: 1 }; cols]; rows],
            start: Position::new(0, 0),
            goal: Position::new(rows.saturating_sub(1), cols.saturating_sub(1)),
            scheduled: FxHashMap::default(),
            moving: Vec::new(),
        }
    }

    /// Random grid with walls on roughly one cell in six, never on start or goal.
    pub fn random<R: Rng>(rows: usize, cols: usize, rng: &mut R) -> Self {
        let mut grid = Grid::new(rows, cols);
        if rows == 0 || cols == 0 {
            return grid;
        }
        for _ in 0..(rows * cols / 6) {
            let pos = Position::new(rng.gen_range(0..rows), rng.gen_range(0..cols));
            if pos != grid.start && pos != grid.goal {
                grid.add_wall(pos);
            }
        }
        grid
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MapError> {
        let path = path.as_ref();
        std::fs::read_to_string(path)
            .map_err(|source| MapError::Read {
                path: path.to_path_buf(),
                source,
            })?
            .parse()
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), MapError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_map_string()).map_err(|source| MapError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The cell at `pos`, or `None` outside the grid.
    pub fn cell(&self, pos: Position) -> Option<Cell> {
        self.cells.get(pos.row)?.get(pos.col).copied()
    }

    /// Sets the terrain cost of an open cell, clamped to at least 1.
    /// Writes outside the grid are ignored.
    pub fn set_terrain_cost(&mut self, pos: Position, cost: u32) {
        if self.contains(pos) {
            self.cells[pos.row][pos.col] = Cell::Open { cost: cost.max(1) };
        }
    }

    pub fn add_wall(&mut self, pos: Position) {
        if self.contains(pos) {
            self.cells[pos.row][pos.col] = Cell::Wall;
        }
    }

    pub fn is_wall(&self, pos: Position) -> bool {
        self.contains(pos) && self.cells[pos.row][pos.col] == Cell::Wall
    }

    /// Blocks `pos` at each of the given ticks.
    pub fn add_dynamic_obstacle(&mut self, pos: Position, times: &[u64]) {
        for &time in times {
            self.scheduled.entry(time).or_default().insert(pos);
        }
    }

    /// Blocks one cell per tick, as given by `schedule`.
    pub fn add_scheduled_obstacle(&mut self, schedule: &FxHashMap<u64, Position>) {
        for (&time, &pos) in schedule {
            self.scheduled.entry(time).or_default().insert(pos);
        }
    }

    pub fn add_moving_obstacle(&mut self, obstacle: MovingObstacle) {
        self.moving.push(obstacle);
    }

    pub fn moving_obstacles(&self) -> &[MovingObstacle] {
        &self.moving
    }

    /// Drops every scheduled and moving obstacle, keeping walls and terrain.
    pub fn clear_dynamic_obstacles(&mut self) {
        self.scheduled.clear();
        self.moving.clear();
    }

    /// True when `pos` is a wall or occupied by a scheduled or moving
    /// obstacle at `time`.
    pub fn is_blocked(&self, pos: Position, time: u64) -> bool {
        if self.is_wall(pos) {
            return true;
        }
        if self
            .scheduled
            .get(&time)
            .is_some_and(|cells| cells.contains(&pos))
        {
            return true;
        }
        self.moving.iter().any(|o| o.position_at(time) == Some(pos))
    }

    /// Cells held by dynamic obstacles at `time`, sorted.
    pub fn obstacle_positions(&self, time: u64) -> Vec<Position> {
        let mut positions: FxHashSet<Position> = self
            .scheduled
            .get(&time)
            .map(|cells| cells.iter().copied().collect())
            .unwrap_or_default();
        positions.extend(self.moving.iter().filter_map(|o| o.position_at(time)));
        let mut positions: Vec<_> = positions.into_iter().collect();
        positions.sort();
        positions
    }

    /// In-bounds 4-connected neighbors of `pos` for which `blocked` is false,
    /// in the order down, right, up, left, paired with their terrain cost.
    pub fn open_neighbors(
        &self,
        pos: Position,
        blocked: impl Fn(Position) -> bool,
    ) -> Vec<(Position, u32)> {
        let mut neighbors = Vec::with_capacity(4);
        if !self.contains(pos) {
            return neighbors;
        }
        let (r, c) = (pos.row as i64, pos.col as i64);

        for (dr, dc) in &[(1, 0), (0, 1), (-1, 0), (0, -1)] {
            let nr = r + dr;
            let nc = c + dc;
            if nr < 0 || nc < 0 || nr >= self.rows as i64 || nc >= self.cols as i64 {
                continue;
            }
            let next = Position::new(nr as usize, nc as usize);
            if !blocked(next) {
                neighbors.push((next, self.terrain_cost(next)));
            }
        }
        neighbors
    }

    fn terrain_cost(&self, pos: Position) -> u32 {
        match self.cells[pos.row][pos.col] {
            Cell::Open { cost } => cost,
            Cell::Wall => 1,
        }
    }

    pub fn to_map_string(&self) -> String {
        let mut out = String::new();
        for (r, row) in self.cells.iter().enumerate() {
            let tokens: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(c, cell)| {
                    let pos = Position::new(r, c);
                    if pos == self.start {
                        "S".to_string()
                    } else if pos == self.goal {
                        "G".to_string()
                    } else {
                        match cell {
                            Cell::Wall => "X".to_string(),
                            Cell::Open { cost } => cost.to_string(),
                        }
                    }
                })
                .collect();
            out.push_str(&tokens.join(","));
            out.push('\n');
        }
        out
    }

    /// Text view of the grid at `time`: `A` agent, `S`/`G` endpoints,
    /// `X` blocked, `*` path, otherwise the terrain cost.
    pub fn render(&self, time: u64, path: &[Position], agent: Option<Position>) -> String {
        let on_path: FxHashSet<Position> = path.iter().copied().collect();
        let mut out = String::from("   ");
        for c in 0..self.cols {
            out.push_str(&format!("{:2}", c % 10));
        }
        out.push('\n');

        for r in 0..self.rows {
            out.push_str(&format!("{:2} ", r));
            for c in 0..self.cols {
                let pos = Position::new(r, c);
                let symbol = if Some(pos) == agent {
                    "A".to_string()
                } else if pos == self.start {
                    "S".to_string()
                } else if pos == self.goal {
                    "G".to_string()
                } else if self.is_blocked(pos, time) {
                    "X".to_string()
                } else if on_path.contains(&pos) {
                    "*".to_string()
                } else {
                    self.terrain_cost(pos).min(9).to_string()
                };
                out.push_str(&format!("{} ", symbol));
            }
            out.push('\n');
        }
        out
    }
}

impl Environment for Grid {
    fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn cost(&self, pos: Position) -> Result<u32, SearchError> {
        self.check_bounds(pos)?;
        Ok(self.terrain_cost(pos))
    }

    fn neighbors(&self, pos: Position, time: u64) -> Vec<(Position, u32)> {
        self.open_neighbors(pos, |p| self.is_blocked(p, time))
    }
}

impl FromStr for Grid {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if lines.is_empty() {
            return Err(MapError::Empty);
        }

        let cols = lines[0].split(',').count();
        let mut grid = Grid::new(lines.len(), cols);

        for (r, line) in lines.iter().enumerate() {
            let tokens: Vec<&str> = line.split(',').map(str::trim).collect();
            if tokens.len() != cols {
                return Err(MapError::RaggedRow {
                    row: r,
                    found: tokens.len(),
                    expected: cols,
                });
            }
            for (c, token) in tokens.into_iter().enumerate() {
                let pos = Position::new(r, c);
                match token {
                    "S" => grid.start = pos,
                    "G" => grid.goal = pos,
                    "X" => grid.add_wall(pos),
                    digits
                        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) =>
                    {
                        grid.set_terrain_cost(pos, digits.parse().unwrap_or(u32::MAX));
                    }
                    // `D` marks a spawn cell for dynamic obstacles added later.
                    _ => {}
                }
            }
        }
        Ok(grid)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(0, &[], None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors_of_corner_in_open_grid() {
        let grid = Grid::new(5, 5);
        let n = grid.neighbors(Position::new(0, 0), 0);
        assert_eq!(
            n,
            vec![(Position::new(1, 0), 1), (Position::new(0, 1), 1)]
        );
    }

    #[test]
    fn walls_and_scheduled_obstacles_block_neighbors() {
        let mut grid = Grid::new(3, 3);
        grid.add_wall(Position::new(1, 0));
        grid.add_dynamic_obstacle(Position::new(0, 1), &[2]);

        assert!(grid
            .neighbors(Position::new(0, 0), 1)
            .contains(&(Position::new(0, 1), 1)));
        assert!(grid.neighbors(Position::new(0, 0), 2).is_empty());
    }

    #[test]
    fn scheduled_obstacle_blocks_one_cell_per_tick() {
        let mut grid = Grid::new(3, 3);
        let schedule: FxHashMap<u64, Position> = [
            (1, Position::new(0, 1)),
            (2, Position::new(1, 1)),
            (3, Position::new(2, 1)),
        ]
        .into_iter()
        .collect();
        grid.add_scheduled_obstacle(&schedule);

        assert!(grid.is_blocked(Position::new(0, 1), 1));
        assert!(!grid.is_blocked(Position::new(0, 1), 2));
        assert_eq!(grid.obstacle_positions(2), vec![Position::new(1, 1)]);
        assert!(grid.obstacle_positions(4).is_empty());
    }

    #[test]
    fn clearing_dynamic_obstacles_keeps_walls_and_terrain() {
        let mut grid = Grid::new(3, 3);
        grid.add_wall(Position::new(1, 1));
        grid.set_terrain_cost(Position::new(0, 2), 5);
        grid.add_dynamic_obstacle(Position::new(0, 1), &[0, 1]);
        grid.add_moving_obstacle(MovingObstacle::new(vec![Position::new(2, 0)], 1, 0));

        grid.clear_dynamic_obstacles();

        assert!(grid.obstacle_positions(0).is_empty());
        assert!(grid.moving_obstacles().is_empty());
        assert!(!grid.is_blocked(Position::new(0, 1), 1));
        assert!(grid.is_wall(Position::new(1, 1)));
        assert_eq!(grid.cell(Position::new(0, 2)), Some(Cell::Open { cost: 5 }));
    }

    #[test]
    fn cell_accessor_is_bounds_checked() {
        let mut grid = Grid::new(2, 3);
        grid.add_wall(Position::new(1, 2));
        assert_eq!(grid.cell(Position::new(0, 0)), Some(Cell::Open { cost: 1 }));
        assert_eq!(grid.cell(Position::new(1, 2)), Some(Cell::Wall));
        assert_eq!(grid.cell(Position::new(2, 0)), None);
        assert_eq!(grid.cell(Position::new(0, 3)), None);
    }

    #[test]
    fn save_then_load_restores_the_map() {
        let mut grid = Grid::new(3, 4);
        grid.goal = Position::new(2, 1);
        grid.add_wall(Position::new(1, 1));
        grid.set_terrain_cost(Position::new(0, 3), 4);

        let path = std::env::temp_dir().join(format!("grid-save-{}.map", std::process::id()));
        grid.save(&path).unwrap();
        let loaded = Grid::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.to_map_string(), grid.to_map_string());
        assert_eq!(loaded.goal, Position::new(2, 1));
        assert_eq!(loaded.cost(Position::new(0, 3)), Ok(4));
    }

    #[test]
    fn loading_a_missing_file_names_the_path() {
        let path = std::env::temp_dir().join("no-such-dir-for-grid").join("missing.map");
        let err = Grid::load(&path).unwrap_err();
        assert!(matches!(err, MapError::Read { .. }));
        assert!(err.to_string().contains("missing.map"));
    }

    #[test]
    fn cost_out_of_bounds_is_an_error() {
        let grid = Grid::new(2, 2);
        assert_eq!(
            grid.cost(Position::new(2, 0)),
            Err(SearchError::OutOfBounds {
                position: Position::new(2, 0),
                rows: 2,
                cols: 2
            })
        );
    }

    #[test]
    fn terrain_cost_is_clamped() {
        let mut grid = Grid::new(2, 2);
        grid.set_terrain_cost(Position::new(1, 1), 0);
        assert_eq!(grid.cost(Position::new(1, 1)), Ok(1));
        grid.set_terrain_cost(Position::new(5, 5), 7);
    }

    #[test]
    fn parses_map_text() {
        let grid: Grid = "S,1,3\n2,X,1\n\n1,1,G\n".parse().unwrap();
        assert_eq!((grid.rows, grid.cols), (3, 3));
        assert_eq!(grid.start, Position::new(0, 0));
        assert_eq!(grid.goal, Position::new(2, 2));
        assert!(grid.is_wall(Position::new(1, 1)));
        assert_eq!(grid.cost(Position::new(0, 2)), Ok(3));
        assert_eq!(grid.cost(Position::new(1, 0)), Ok(2));
    }

    #[test]
    fn map_string_round_trips_layout() {
        let text = "S,1,3\n2,X,1\n1,D,G\n";
        let grid: Grid = text.parse().unwrap();
        assert_eq!(grid.to_map_string(), "S,1,3\n2,X,1\n1,1,G\n");
    }

    #[test]
    fn rejects_bad_maps() {
        assert!(matches!("".parse::<Grid>(), Err(MapError::Empty)));
        assert!(matches!(
            "1,1\n1".parse::<Grid>(),
            Err(MapError::RaggedRow { row: 1, found: 1, expected: 2 })
        ));
    }

    #[test]
    fn render_marks_agent_path_and_obstacles() {
        let mut grid = Grid::new(2, 3);
        grid.add_wall(Position::new(0, 2));
        let path = [Position::new(1, 0), Position::new(1, 1)];
        let text = grid.render(0, &path, Some(Position::new(1, 1)));
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows[1], " 0 S 1 X ");
        assert_eq!(rows[2], " 1 * A G ");
    }
}
