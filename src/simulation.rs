use crate::agent::{Agent, ObservedGrid};
use crate::algorithms::{search_with_rng, Algorithm, SearchOptions, SearchResult};
use crate::error::SearchError;
use crate::grid::{Grid, Position};
use crate::statistics::Statistics;
use log::{info, warn};
use pathfinding::prelude::dijkstra;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// How much of the obstacle schedule the agent plans with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Knowledge {
    /// Plans against the full time-dependent grid.
    Full,
    /// Plans against walls plus dynamic obstacles seen within
    /// `field_of_view` cells, assumed to stay put.
    Local { field_of_view: usize },
}

#[derive(Debug, Clone, Copy)]
pub struct SimulationSettings {
    pub max_replans: usize,
    pub max_ticks: u64,
    pub start_time: u64,
    pub knowledge: Knowledge,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        SimulationSettings {
            max_replans: 3,
            max_ticks: 100,
            start_time: 0,
            knowledge: Knowledge::Local { field_of_view: 3 },
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeliveryReport {
    pub algorithm: Algorithm,
    pub success: bool,
    pub statistics: Statistics,
    pub path: Vec<Position>,
    pub log: Vec<String>,
}

/// Drives one agent from the grid start to its goal, replanning when the
/// next cell turns out to be blocked.
pub struct Simulation<'a> {
    grid: &'a Grid,
    algorithm: Algorithm,
    options: SearchOptions,
    settings: SimulationSettings,
    rng: StdRng,
}

impl<'a> Simulation<'a> {
    pub fn new(
        grid: &'a Grid,
        algorithm: Algorithm,
        options: SearchOptions,
        settings: SimulationSettings,
    ) -> Self {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Simulation {
            grid,
            algorithm,
            options,
            settings,
            rng,
        }
    }

    pub fn run(&mut self) -> Result<DeliveryReport, SearchError> {
        let goal = self.grid.goal;
        let start_time = self.settings.start_time;
        let field_of_view = match self.settings.knowledge {
            Knowledge::Local { field_of_view } => field_of_view,
            Knowledge::Full => 0,
        };
        let mut agent = Agent::new(self.grid.start, start_time, field_of_view);
        let mut stats = Statistics::new(baseline_cost(self.grid));

        self.observe(&mut agent);
        let mut plan = self.plan(&agent, &mut stats)?;
        let mut next_index = 1;
        if !plan.success {
            agent.record(format!("no route from {} to {}", agent.position, goal));
        }

        while agent.position != goal {
            if agent.time - start_time >= self.settings.max_ticks {
                agent.record(format!("gave up after {} ticks", self.settings.max_ticks));
                break;
            }

            let next = plan.path.get(next_index).copied();
            let blocked = next.map_or(true, |n| self.grid.is_blocked(n, agent.time + 1));
            if !blocked {
                if let Some(next) = next {
                    agent.move_to(self.grid, next)?;
                    stats.total_moves += 1;
                    next_index += 1;
                    self.observe(&mut agent);
                    continue;
                }
            }

            if stats.replans >= self.settings.max_replans {
                agent.record(format!(
                    "replan limit of {} reached at {}",
                    self.settings.max_replans, agent.position
                ));
                break;
            }
            stats.replans += 1;

            match next {
                Some(next) if plan.success => {
                    agent.record(format!("{} blocked at t={}, replanning", next, agent.time + 1));
                    agent.known_obstacles.insert(next);
                }
                _ => {
                    agent.record(format!("waiting at {}", agent.position));
                    agent.wait();
                    self.observe(&mut agent);
                }
            }

            plan = self.plan(&agent, &mut stats)?;
            next_index = 1;
        }

        let success = agent.position == goal;
        stats.total_cost = agent.total_cost;
        stats.time_steps = agent.time - start_time;
        stats.calculate_efficiency();

        if success {
            info!(
                "{} delivered in {} ticks, cost {}, {} replans",
                self.algorithm, stats.time_steps, stats.total_cost, stats.replans
            );
        } else {
            warn!(
                "{} failed to deliver, stopped at {} after {} ticks",
                self.algorithm, agent.position, stats.time_steps
            );
        }

        Ok(DeliveryReport {
            algorithm: self.algorithm,
            success,
            statistics: stats,
            path: agent.path,
            log: agent.log,
        })
    }

    fn observe(&self, agent: &mut Agent) {
        if let Knowledge::Local { .. } = self.settings.knowledge {
            agent.observe(self.grid);
        }
    }

    fn plan(&mut self, agent: &Agent, stats: &mut Statistics) -> Result<SearchResult, SearchError> {
        let goal = self.grid.goal;
        let result = match self.settings.knowledge {
            Knowledge::Full => search_with_rng(
                self.grid,
                self.algorithm,
                agent.position,
                goal,
                agent.time,
                &self.options,
                &mut self.rng,
            )?,
            Knowledge::Local { .. } => {
                let view = ObservedGrid::new(self.grid, &agent.known_obstacles);
                search_with_rng(
                    &view,
                    self.algorithm,
                    agent.position,
                    goal,
                    agent.time,
                    &self.options,
                    &mut self.rng,
                )?
            }
        };
        stats.nodes_expanded += result.nodes_expanded;
        stats.planning_time += result.elapsed;
        Ok(result)
    }
}

/// Cheapest start-to-goal cost with walls only, ignoring dynamic obstacles.
pub fn baseline_cost(grid: &Grid) -> Option<u64> {
    dijkstra(
        &grid.start,
        |&p| {
            grid.open_neighbors(p, |n| grid.is_wall(n))
                .into_iter()
                .map(|(n, c)| (n, u64::from(c)))
        },
        |&p| p == grid.goal,
    )
    .map(|(_, cost)| cost)
}

/// Runs every algorithm in `algorithms` on the same grid.
pub fn compare_algorithms(
    grid: &Grid,
    algorithms: &[Algorithm],
    options: SearchOptions,
    settings: SimulationSettings,
) -> Result<Vec<DeliveryReport>, SearchError> {
    algorithms
        .iter()
        .map(|&algorithm| Simulation::new(grid, algorithm, options, settings).run())
        .collect()
}

/// One algorithm's delivery on a grid with its dynamic obstacles removed
/// (`calm`) and with them in place (`busy`).
#[derive(Debug, Clone)]
pub struct DemoRun {
    pub calm: DeliveryReport,
    pub busy: DeliveryReport,
}

/// Runs each algorithm twice on `grid`: once with the dynamic obstacles
/// cleared and once with them, to show what replanning costs.
pub fn replanning_demo(
    grid: &Grid,
    algorithms: &[Algorithm],
    options: SearchOptions,
    settings: SimulationSettings,
) -> Result<Vec<DemoRun>, SearchError> {
    let mut calm_grid = grid.clone();
    calm_grid.clear_dynamic_obstacles();

    algorithms
        .iter()
        .map(|&algorithm| {
            let calm = Simulation::new(&calm_grid, algorithm, options, settings).run()?;
            let busy = Simulation::new(grid, algorithm, options, settings).run()?;
            Ok(DemoRun { calm, busy })
        })
        .collect()
}

/// Comparison table of delivery reports, one row per algorithm.
pub fn format_comparison(reports: &[DeliveryReport]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<10} {:<8} {:<6} {:<9} {:<11} {:<6} {:<9} {:<8} {:<12}\n",
        "Algorithm",
        "Success",
        "Cost",
        "Baseline",
        "Efficiency",
        "Ticks",
        "Expanded",
        "Replans",
        "Planning"
    ));
    out.push_str(&"-".repeat(85));
    out.push('\n');

    for report in reports {
        let stats = &report.statistics;
        let baseline = stats
            .baseline_cost
            .map_or_else(|| "-".to_string(), |c| c.to_string());
        out.push_str(&format!(
            "{:<10} {:<8} {:<6} {:<9} {:<11} {:<6} {:<9} {:<8} {:<12}\n",
            report.algorithm.name(),
            if report.success { "yes" } else { "no" },
            stats.total_cost,
            baseline,
            format!("{:.3}", stats.route_efficiency),
            stats.time_steps,
            stats.nodes_expanded,
            stats.replans,
            format!("{:.2?}", stats.planning_time),
        ));
    }

    let delivered: Vec<&DeliveryReport> = reports.iter().filter(|r| r.success).collect();
    if let Some(cheapest) = delivered.iter().min_by_key(|r| r.statistics.total_cost) {
        out.push_str(&format!(
            "\nCheapest delivery: {} (cost {})\n",
            cheapest.algorithm, cheapest.statistics.total_cost
        ));
    }
    if let Some(leanest) = delivered.iter().min_by_key(|r| r.statistics.nodes_expanded) {
        out.push_str(&format!(
            "Fewest nodes expanded: {} ({})\n",
            leanest.algorithm, leanest.statistics.nodes_expanded
        ));
    }
    out
}
