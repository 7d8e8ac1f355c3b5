use crate::error::SearchError;
use crate::grid::Position;

/// Read-only view of a grid world consumed by the search algorithms.
///
/// Implementations must return neighbors in a deterministic order for a fixed
/// environment state, otherwise tie-breaking and seeded local search are not
/// reproducible.
pub trait Environment {
    /// Grid dimensions as `(rows, cols)`.
    fn dimensions(&self) -> (usize, usize);

    /// Terrain cost of entering `pos`. Always at least 1.
    fn cost(&self, pos: Position) -> Result<u32, SearchError>;

    /// 4-connected neighbors of `pos` that are passable at simulated `time`,
    /// paired with the cost of moving onto them.
    fn neighbors(&self, pos: Position, time: u64) -> Vec<(Position, u32)>;

    fn contains(&self, pos: Position) -> bool {
        let (rows, cols) = self.dimensions();
        pos.row < rows && pos.col < cols
    }

    /// Returns `OutOfBounds` when `pos` lies outside the grid.
    fn check_bounds(&self, pos: Position) -> Result<(), SearchError> {
        if self.contains(pos) {
            Ok(())
        } else {
            let (rows, cols) = self.dimensions();
            Err(SearchError::OutOfBounds {
                position: pos,
                rows,
                cols,
            })
        }
    }
}

/// Manhattan distance, admissible for 4-connected moves costing at least 1.
pub fn manhattan(a: Position, b: Position) -> u64 {
    (a.row.abs_diff(b.row) + a.col.abs_diff(b.col)) as u64
}
