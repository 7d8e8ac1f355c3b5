use crate::grid::Position;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while querying an environment during a search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("position {position} is outside the {rows}x{cols} grid")]
    OutOfBounds {
        position: Position,
        rows: usize,
        cols: usize,
    },
}

/// Errors raised while loading or saving a map file.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to read map {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write map {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("map contains no rows")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },
}

/// An algorithm name that is not one of `bfs`, `ucs`, `astar`, `hillclimb`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown algorithm '{0}', select 'bfs', 'ucs', 'astar', 'hillclimb' or 'all'")]
pub struct ParseAlgorithmError(pub String);
