// src/strategy/implementations.rs

use crate::model::state::SimState;
use crate::simulation::config::SimulationConfig;
use crate::strategy::traits::OrderPolicy;

// =========================================================================
// Coverage Policy (Order-Up-To on recent demand)
// =========================================================================

/// Orders enough to cover a fixed number of days at yesterday's demand.
///
/// Formula: Order = PrevDemand * CoverageDays - (Inventory + Pipeline)
///
/// Orders smaller than a fraction of the base weekday demand are skipped
/// entirely, since they would still pay the full fixed order cost.
#[derive(Debug, Clone, PartialEq)]
pub struct CoveragePolicy {
    coverage_days: u32,
    min_order_fraction: f64,
}

impl CoveragePolicy {
    pub fn new(coverage_days: u32, min_order_fraction: f64) -> Self {
        Self {
            coverage_days,
            min_order_fraction,
        }
    }

    /// Smallest order worth placing under this config.
    pub fn min_order(&self, config: &SimulationConfig) -> f64 {
        f64::from(config.base_weekday_demand) * self.min_order_fraction
    }
}

impl Default for CoveragePolicy {
    /// One week of coverage, skip orders below half a weekday's demand.
    fn default() -> Self {
        Self::new(7, 0.5)
    }
}

impl OrderPolicy for CoveragePolicy {
    fn calculate_order(&self, state: &SimState, config: &SimulationConfig) -> u32 {
        let target = f64::from(state.prev_demand) * f64::from(self.coverage_days);
        let projected = state.projected_inventory() as f64;

        // Negative when we already hold more than the target
        let raw_order = target - projected;

        if raw_order < self.min_order(config) {
            return 0;
        }

        raw_order.max(0.0).min(f64::from(config.max_capacity)).round() as u32
    }
}
