use clap::Parser;

use delivery_pathfinding::algorithms::Algorithm;
use delivery_pathfinding::config::Config;
use delivery_pathfinding::grid::{Grid, Position};
use delivery_pathfinding::maps;
use delivery_pathfinding::obstacles::MovingObstacle;
use delivery_pathfinding::simulation::{
    compare_algorithms, format_comparison, replanning_demo, DeliveryReport,
};
use delivery_pathfinding::MapError;
use rand::rngs::StdRng;
use rand::SeedableRng;

const SAMPLE_MAP: &str = "\
S,1,1,1,1
1,3,1,1,1
1,1,X,1,1
1,1,1,2,1
1,1,1,1,G
";

fn build_grid(config: &Config, rng: &mut StdRng) -> Result<Grid, MapError> {
    let mut grid = if let Some(path) = &config.map {
        let grid = Grid::load(path)?;
        println!("Loaded map from {}", path.display());
        grid
    } else if config.rows.is_some() || config.cols.is_some() {
        let rows = config.rows.or(config.cols).unwrap_or(5);
        let cols = config.cols.or(config.rows).unwrap_or(5);
        println!("Created random {}x{} map", rows, cols);
        Grid::random(rows, cols, rng)
    } else {
        SAMPLE_MAP.parse::<Grid>()?
    };

    if config.dynamic {
        for (path_length, speed, start_time) in [(5, 2, 2), (4, 3, 5)] {
            let obstacle = MovingObstacle::random(&grid, rng, path_length, speed, start_time);
            if let Some(obstacle) = obstacle {
                grid.add_moving_obstacle(obstacle);
            }
        }
        println!("Added {} moving obstacles", grid.moving_obstacles().len());
    }
    Ok(grid)
}

fn print_log(report: &DeliveryReport) {
    println!("Execution log (last 5 entries):");
    for entry in report.log.iter().rev().take(5).rev() {
        println!("  {}", entry);
    }
    println!();
}

fn run_demo(config: &Config, algorithms: &[Algorithm]) {
    let grid = match maps::dynamic_demo_grid() {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("Failed to build demo grid: {}", e);
            std::process::exit(1);
        }
    };

    println!("=== DYNAMIC REPLANNING DEMONSTRATION ===");
    println!("{}", grid);
    for obstacle in grid.moving_obstacles() {
        let route: Vec<String> = obstacle.path().iter().map(|p| p.to_string()).collect();
        println!("Moving obstacle route: {}", route.join(" -> "));
    }

    let runs = match replanning_demo(
        &grid,
        algorithms,
        config.search_options(),
        config.simulation_settings(),
    ) {
        Ok(runs) => runs,
        Err(e) => {
            eprintln!("Demo failed: {}", e);
            std::process::exit(1);
        }
    };

    for run in &runs {
        let (calm, busy) = (&run.calm.statistics, &run.busy.statistics);
        println!("=== {} ===", run.busy.algorithm.name().to_uppercase());
        if !config.quiet {
            let end = run.busy.path.last().copied();
            println!("{}", grid.render(busy.time_steps, &run.busy.path, end));
        }
        println!(
            "Without moving obstacles: success {}, cost {}, {} ticks",
            run.calm.success, calm.total_cost, calm.time_steps
        );
        println!(
            "With moving obstacles:    success {}, cost {}, {} ticks, {} replans",
            run.busy.success, busy.total_cost, busy.time_steps, busy.replans
        );
        if busy.replans > 0 {
            print_log(&run.busy);
        }
    }
}

fn main() {
    env_logger::init();
    let config = Config::parse();

    let algorithms = match config.algorithms() {
        Ok(algorithms) => algorithms,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    if config.generate_maps {
        match maps::generate_sample_maps(&config.maps_dir, &mut rng) {
            Ok(paths) => {
                for path in paths {
                    println!("Wrote {}", path.display());
                }
            }
            Err(e) => {
                eprintln!("Failed to generate maps: {}", e);
                std::process::exit(1);
            }
        }
    }

    if config.demo {
        run_demo(&config, &algorithms);
        return;
    }

    let grid = match build_grid(&config, &mut rng) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("Failed to build grid: {}", e);
            std::process::exit(1);
        }
    };

    if !config.quiet {
        println!("Grid {}x{}, start {}, goal {}", grid.rows, grid.cols, grid.start, grid.goal);
        println!("{}", grid);
    }

    let reports = match compare_algorithms(
        &grid,
        &algorithms,
        config.search_options(),
        config.simulation_settings(),
    ) {
        Ok(reports) => reports,
        Err(e) => {
            eprintln!("Search failed: {}", e);
            std::process::exit(1);
        }
    };

    for report in &reports {
        if !config.quiet {
            println!("=== {} ===", report.algorithm.name().to_uppercase());
            let end = report.path.last().copied().unwrap_or(Position::new(0, 0));
            println!(
                "{}",
                grid.render(report.statistics.time_steps, &report.path, Some(end))
            );
        }
        println!("Success: {}", report.success);
        println!("{}", report.statistics);

        if !config.quiet && report.statistics.replans > 0 {
            print_log(report);
        }
    }

    if reports.len() > 1 {
        println!("=== ALGORITHM COMPARISON ===");
        println!("{}", format_comparison(&reports));
    }
}
