// src/simulation/sweep.rs

//! Many independent runs of the same config, one per seed.
//!
//! Every run owns its RNG, state and history, so runs are spread over the
//! rayon pool with no shared mutable state.

use crate::model::state::SimState;
use crate::simulation::config::SimulationConfig;
use crate::simulation::engine::run_simulation;
use crate::simulation::kpi::{compute_kpis, Kpis};
use crate::strategy::traits::OrderPolicy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use std::ops::Range;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunOutcome {
    pub seed: u64,
    pub kpis: Kpis,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SweepStats {
    pub num_runs: usize,
    pub mean_cost: f64,
    pub std_dev_cost: f64,
    pub min_cost: f64,
    pub max_cost: f64,
    pub percentile_10: f64,
    pub percentile_50: f64,
    pub percentile_90: f64,
    pub mean_stockout: f64,
    pub mean_inventory: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepSummary {
    /// Ordered by seed.
    pub runs: Vec<RunOutcome>,
    pub stats: SweepStats,
}

pub fn run_sweep<P>(config: &SimulationConfig, policy: &P, seeds: Range<u64>) -> SweepSummary
where
    P: OrderPolicy + ?Sized,
{
    let initial = SimState::initial(config);

    let runs: Vec<RunOutcome> = seeds
        .into_par_iter()
        .map(|seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let history = run_simulation(&initial, config, policy, &mut rng);
            RunOutcome {
                seed,
                kpis: compute_kpis(&history),
            }
        })
        .collect();

    let stats = summarize(&runs);
    info!(
        runs = stats.num_runs,
        mean_cost = stats.mean_cost,
        std_dev_cost = stats.std_dev_cost,
        "sweep complete"
    );

    SweepSummary { runs, stats }
}

fn summarize(runs: &[RunOutcome]) -> SweepStats {
    if runs.is_empty() {
        return SweepStats::default();
    }

    let n = runs.len() as f64;
    let mut costs: Vec<f64> = runs.iter().map(|r| r.kpis.total_cost as f64).collect();
    costs.sort_by(|a, b| a.total_cmp(b));

    let mean_cost = costs.iter().sum::<f64>() / n;
    let variance = costs.iter().map(|c| (c - mean_cost).powi(2)).sum::<f64>() / n;

    let percentile = |p: f64| {
        let index = ((p / 100.0) * (costs.len() as f64 - 1.0)).round() as usize;
        costs[index.min(costs.len() - 1)]
    };

    SweepStats {
        num_runs: runs.len(),
        mean_cost,
        std_dev_cost: variance.sqrt(),
        min_cost: costs[0],
        max_cost: costs[costs.len() - 1],
        percentile_10: percentile(10.0),
        percentile_50: percentile(50.0),
        percentile_90: percentile(90.0),
        mean_stockout: runs.iter().map(|r| r.kpis.total_stockout as f64).sum::<f64>() / n,
        mean_inventory: runs.iter().map(|r| r.kpis.avg_inventory as f64).sum::<f64>() / n,
    }
}
