use crate::algorithms::{Algorithm, SearchOptions};
use crate::error::ParseAlgorithmError;
use crate::simulation::{Knowledge, SimulationSettings};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Map file to load (comma-separated cells: S, G, X or a terrain cost)
    #[arg(long)]
    pub map: Option<PathBuf>,

    /// bfs, ucs, astar, hillclimb or all
    #[arg(long, default_value = "all")]
    pub algorithm: String,

    /// Rows of a randomly generated map
    #[arg(long)]
    pub rows: Option<usize>,

    /// Columns of a randomly generated map
    #[arg(long)]
    pub cols: Option<usize>,

    /// Add randomly moving obstacles
    #[arg(long, default_value_t = false)]
    pub dynamic: bool,

    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = 10)]
    pub max_restarts: usize,

    /// Moves per hill-climbing attempt
    #[arg(long, default_value_t = 100)]
    pub max_steps: usize,

    #[arg(long, default_value_t = 3)]
    pub max_replans: usize,

    /// Ticks the delivery may take before the agent gives up
    #[arg(long, default_value_t = 100)]
    pub max_ticks: u64,

    /// Simulated departure time
    #[arg(long, default_value_t = 0)]
    pub time_step: u64,

    /// Cells the agent can see in each direction; 0 plans with the full
    /// obstacle schedule
    #[arg(long, default_value_t = 3)]
    pub field_of_view: usize,

    #[arg(long, default_value_t = false)]
    pub quiet: bool,

    /// Run the dynamic replanning demonstration on its built-in map
    #[arg(long, default_value_t = false)]
    pub demo: bool,

    /// Write small, medium, large and dynamic sample maps to --maps-dir
    #[arg(long, default_value_t = false)]
    pub generate_maps: bool,

    #[arg(long, default_value = "maps")]
    pub maps_dir: PathBuf,
}

impl Config {
    pub fn algorithms(&self) -> Result<Vec<Algorithm>, ParseAlgorithmError> {
        if self.algorithm.eq_ignore_ascii_case("all") {
            Ok(Algorithm::ALL.to_vec())
        } else {
            Ok(vec![self.algorithm.parse()?])
        }
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            max_restarts: self.max_restarts,
            max_steps: self.max_steps,
            seed: self.seed,
        }
    }

    pub fn simulation_settings(&self) -> SimulationSettings {
        let knowledge = if self.field_of_view == 0 {
            Knowledge::Full
        } else {
            Knowledge::Local {
                field_of_view: self.field_of_view,
            }
        };
        SimulationSettings {
            max_replans: self.max_replans,
            max_ticks: self.max_ticks,
            start_time: self.time_step,
            knowledge,
        }
    }
}
