//! Ready-made maps: randomly generated sample files and the fixed grid used
//! by the replanning demonstration.

use crate::error::MapError;
use crate::grid::{Grid, Position};
use crate::obstacles::MovingObstacle;
use log::info;
use rand::Rng;
use std::path::{Path, PathBuf};

/// File name, rows and columns of each generated sample map.
pub const SAMPLE_MAPS: [(&str, usize, usize); 4] = [
    ("small.map", 10, 10),
    ("medium.map", 20, 20),
    ("large.map", 50, 50),
    ("dynamic.map", 15, 15),
];

const DEMO_MAP: &str = "\
S,1,1,1,1,1,1,1
1,1,1,1,1,1,1,1
1,1,X,X,1,1,1,1
1,1,1,2,2,1,X,1
1,1,1,2,2,1,X,1
1,1,1,1,1,1,1,1
1,X,X,1,1,1,1,1
1,1,1,1,1,1,1,G
";

/// Random map with walls from [`Grid::random`] and rough terrain (cost 2 to
/// 5) on roughly one open cell in eight.
pub fn random_map<R: Rng>(rows: usize, cols: usize, rng: &mut R) -> Grid {
    let mut grid = Grid::random(rows, cols, rng);
    for _ in 0..(rows * cols / 8) {
        let pos = Position::new(rng.gen_range(0..rows), rng.gen_range(0..cols));
        if pos != grid.start && pos != grid.goal && !grid.is_wall(pos) {
            grid.set_terrain_cost(pos, rng.gen_range(2..=5));
        }
    }
    grid
}

/// Writes every map in [`SAMPLE_MAPS`] into `dir`, creating it if needed,
/// and returns the written paths.
pub fn generate_sample_maps<R: Rng>(dir: &Path, rng: &mut R) -> Result<Vec<PathBuf>, MapError> {
    std::fs::create_dir_all(dir).map_err(|source| MapError::Write {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(SAMPLE_MAPS.len());
    for (name, rows, cols) in SAMPLE_MAPS {
        let path = dir.join(name);
        random_map(rows, cols, rng).save(&path)?;
        info!("wrote {}x{} map to {}", rows, cols, path.display());
        written.push(path);
    }
    Ok(written)
}

/// The 8x8 demonstration grid with two obstacles sweeping across the
/// agent's route: one down column 1 from tick 2, one up column 5 from tick 1.
pub fn dynamic_demo_grid() -> Result<Grid, MapError> {
    let mut grid: Grid = DEMO_MAP.parse()?;
    let down: Vec<Position> = (1..=5).map(|r| Position::new(r, 1)).collect();
    let up: Vec<Position> = (1..=5).rev().map(|r| Position::new(r, 5)).collect();
    grid.add_moving_obstacle(MovingObstacle::new(down, 2, 2));
    grid.add_moving_obstacle(MovingObstacle::new(up, 3, 1));
    Ok(grid)
}
