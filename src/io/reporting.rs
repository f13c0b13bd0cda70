// src/io/reporting.rs

use crate::error::SimResult;
use crate::simulation::engine::HistoryRecord;
use crate::simulation::kpi::Kpis;
use crate::simulation::sweep::SweepStats;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Window used for the chart series.
pub const SMOOTHING_WINDOW: usize = 7;

/// Rows shown by the console table.
pub const TABLE_DAYS: usize = 30;

/// One day of the smoothed chart series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmoothedPoint {
    pub day: usize,
    pub inventory: f64,
    pub demand: f64,
    pub incoming_avg: f64,
    pub order_qty: f64,
}

/// Trailing moving average. The first `window - 1` points average over
/// whatever history exists so far.
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let mut result = Vec::with_capacity(values.len());
    let mut running = 0.0;

    for (i, value) in values.iter().enumerate() {
        running += value;
        if i >= window {
            running -= values[i - window];
        }
        let len = (i + 1).min(window);
        result.push(running / len as f64);
    }

    result
}

/// Moving averages of the four charted series, aligned by day.
pub fn smoothed_series(history: &[HistoryRecord], window: usize) -> Vec<SmoothedPoint> {
    let series = |f: fn(&HistoryRecord) -> f64| {
        let raw: Vec<f64> = history.iter().map(f).collect();
        moving_average(&raw, window)
    };

    let inventory = series(|r| f64::from(r.inventory));
    let demand = series(|r| f64::from(r.demand));
    let incoming = series(|r| r.incoming_avg);
    let orders = series(|r| f64::from(r.order_qty));

    history
        .iter()
        .enumerate()
        .map(|(i, record)| SmoothedPoint {
            day: record.day,
            inventory: inventory[i],
            demand: demand[i],
            incoming_avg: incoming[i],
            order_qty: orders[i],
        })
        .collect()
}

/// Writes the simulation history to a CSV file.
///
/// # Arguments
/// * `file_path` - The path to save the file (e.g., "results/run_1.csv").
/// * `data` - The history records from the simulation engine.
pub fn write_simulation_log<P: AsRef<Path>>(file_path: P, data: &[HistoryRecord]) -> SimResult<()> {
    write_rows(file_path.as_ref(), data)
}

/// Writes the smoothed chart series to a CSV file.
pub fn write_smoothed_series<P: AsRef<Path>>(file_path: P, data: &[SmoothedPoint]) -> SimResult<()> {
    write_rows(file_path.as_ref(), data)
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> SimResult<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    for row in rows {
        wtr.serialize(row)?;
    }

    // Flush the buffer to ensure all data is written
    wtr.flush()?;

    info!(rows = rows.len(), path = %path.display(), "exported CSV");
    Ok(())
}

/// Formats the first `limit` days as a fixed-width table.
pub fn format_daily_table(history: &[HistoryRecord], limit: usize) -> String {
    let mut out = format!(
        "{:>5} {:>10} {:>8} {:>10} {:>8} {:>9} {:>8}\n",
        "Day", "Inventory", "Demand", "Incoming", "Order", "Stockout", "Reward"
    );
    for record in history.iter().take(limit) {
        out.push_str(&format!(
            "{:>5} {:>10} {:>8} {:>10.0} {:>8} {:>9} {:>8.2}\n",
            record.day,
            record.inventory,
            record.demand,
            record.incoming_avg.round(),
            record.order_qty,
            record.stockout,
            record.reward
        ));
    }
    out
}

pub fn print_daily_table(history: &[HistoryRecord], limit: usize) {
    println!("\n=== Daily Log (first {} days) ===", limit.min(history.len()));
    print!("{}", format_daily_table(history, limit));
}

pub fn print_kpis(kpis: &Kpis) {
    println!("\n=== KPIs ===");
    println!("Average Inventory: {}", kpis.avg_inventory);
    println!("Average Demand:    {}", kpis.avg_demand);
    println!("Total Stockout:    {}", kpis.total_stockout);
    println!("Total Cost:        ${}", kpis.total_cost);
}

pub fn print_sweep_stats(stats: &SweepStats) {
    println!("\n=== Sweep over {} runs ===", stats.num_runs);
    println!(
        "Total Cost: mean ${:.2} ± {:.2} (min ${:.0}, max ${:.0})",
        stats.mean_cost, stats.std_dev_cost, stats.min_cost, stats.max_cost
    );
    println!(
        "Percentiles: P10 ${:.0} | P50 ${:.0} | P90 ${:.0}",
        stats.percentile_10, stats.percentile_50, stats.percentile_90
    );
    println!(
        "Mean Stockout: {:.1}, Mean Avg Inventory: {:.1}",
        stats.mean_stockout, stats.mean_inventory
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(day: usize, inventory: u32, demand: u32, order_qty: u32) -> HistoryRecord {
        HistoryRecord {
            day,
            inventory,
            demand,
            incoming_avg: f64::from(order_qty) / 5.0,
            order_qty,
            stockout: 0,
            reward: 0.0,
            total_cost: 0.0,
        }
    }

    #[test]
    fn test_moving_average_warms_up() {
        let values = [2.0, 4.0, 6.0, 8.0, 10.0];
        assert_eq!(moving_average(&values, 3), vec![2.0, 3.0, 4.0, 6.0, 8.0]);
        assert_eq!(moving_average(&values, 1), values.to_vec());
        assert!(moving_average(&[], 7).is_empty());
    }

    #[test]
    fn test_smoothed_series_aligns_with_days() {
        let history: Vec<HistoryRecord> = (1..=10).map(|d| record(d, 100, d as u32 * 10, 0)).collect();
        let series = smoothed_series(&history, SMOOTHING_WINDOW);

        assert_eq!(series.len(), 10);
        assert_eq!(series[0].day, 1);
        assert_eq!(series[0].demand, 10.0);
        // Days 4..=10 -> demand 40..=100
        assert_eq!(series[9].demand, 70.0);
        assert_eq!(series[9].inventory, 100.0);
    }

    #[test]
    fn test_table_is_truncated() {
        let history: Vec<HistoryRecord> = (1..=45).map(|d| record(d, 10, 10, 0)).collect();
        let table = format_daily_table(&history, TABLE_DAYS);
        // Header plus 30 rows
        assert_eq!(table.lines().count(), 31);
    }

    #[test]
    fn test_write_simulation_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.csv");
        let history = vec![record(1, 400, 100, 0), record(2, 300, 100, 250)];

        write_simulation_log(&path, &history).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("day,inventory,demand,incoming_avg,order_qty,stockout,reward,total_cost")
        );
        assert_eq!(content.lines().count(), 3);
    }
}
