//! Single-agent route planning on grids with terrain costs and obstacles that
//! appear, move and disappear over discrete time steps.
//!
//! The [`algorithms`] module holds the search engine; [`grid`] and
//! [`obstacles`] provide a concrete [`Environment`]; [`simulation`] executes a
//! delivery and replans as obstacles are discovered; [`maps`] writes sample
//! map files and builds the replanning demonstration grid.

pub mod agent;
pub mod algorithms;
pub mod config;
pub mod environment;
pub mod error;
pub mod grid;
pub mod maps;
pub mod obstacles;
pub mod simulation;
pub mod statistics;

pub use algorithms::{search, search_with_rng, Algorithm, SearchOptions, SearchResult};
pub use environment::Environment;
pub use error::{MapError, ParseAlgorithmError, SearchError};
pub use grid::{Grid, Position};
