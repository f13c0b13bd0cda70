// src/simulation/kpi.rs

use crate::simulation::engine::HistoryRecord;
use serde::Serialize;

/// Headline numbers of a finished run, each rounded to the nearest integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Kpis {
    pub avg_inventory: i64,
    pub avg_demand: i64,
    pub total_stockout: i64,
    pub total_cost: i64,
}

/// Reduces a history to its KPIs. An empty history yields all zeros.
pub fn compute_kpis(history: &[HistoryRecord]) -> Kpis {
    if history.is_empty() {
        return Kpis::default();
    }

    let n = history.len() as f64;
    let inventory: f64 = history.iter().map(|r| f64::from(r.inventory)).sum();
    let demand: f64 = history.iter().map(|r| f64::from(r.demand)).sum();
    let stockout: f64 = history.iter().map(|r| f64::from(r.stockout)).sum();
    let cost: f64 = history.iter().map(|r| r.total_cost).sum();

    Kpis {
        avg_inventory: (inventory / n).round() as i64,
        avg_demand: (demand / n).round() as i64,
        total_stockout: stockout.round() as i64,
        total_cost: cost.round() as i64,
    }
}
