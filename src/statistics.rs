use std::fmt;
use std::time::Duration;

/// Totals collected while an agent executes a delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    pub total_cost: u64,
    pub total_moves: usize,
    pub time_steps: u64,
    pub nodes_expanded: usize,
    pub replans: usize,
    pub planning_time: Duration,
    /// Cheapest cost ignoring dynamic obstacles, if the goal is reachable.
    pub baseline_cost: Option<u64>,
    pub route_efficiency: f64,
}

impl Statistics {
    pub fn new(baseline_cost: Option<u64>) -> Self {
        Statistics {
            total_cost: 0,
            total_moves: 0,
            time_steps: 0,
            nodes_expanded: 0,
            replans: 0,
            planning_time: Duration::ZERO,
            baseline_cost,
            route_efficiency: 0.0,
        }
    }

    /// Ratio of the cost actually paid to the static baseline; 1.0 is optimal.
    pub fn calculate_efficiency(&mut self) {
        self.route_efficiency = match self.baseline_cost {
            Some(baseline) if baseline > 0 && self.total_cost > 0 => {
                self.total_cost as f64 / baseline as f64
            }
            _ => 0.0,
        };
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Cost: {}", self.total_cost)?;
        writeln!(f, "Moves: {}", self.total_moves)?;
        writeln!(f, "Time Steps: {}", self.time_steps)?;
        writeln!(f, "Nodes Expanded: {}", self.nodes_expanded)?;
        writeln!(f, "Replans: {}", self.replans)?;
        writeln!(f, "Planning Time: {:.2?}", self.planning_time)?;
        match self.baseline_cost {
            Some(baseline) => writeln!(f, "Static Baseline Cost: {}", baseline)?,
            None => writeln!(f, "Static Baseline Cost: unreachable")?,
        }
        writeln!(f, "Route Efficiency: {:.3}", self.route_efficiency)?;

        if self.route_efficiency > 1.0 {
            writeln!(
                f,
                "Note: paid {:.1}% over the static baseline",
                (self.route_efficiency - 1.0) * 100.0
            )?;
        }

        Ok(())
    }
}
