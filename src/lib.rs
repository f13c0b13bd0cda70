//! Single-item inventory control simulation.
//!
//! A warehouse is stepped one day at a time: deliveries arrive from a
//! lead-time pipeline, a replenishment policy places an order, stochastic
//! demand is drawn and served, and each day's costs are recorded.
//!
//! ```
//! use inventory_sim::simulation::config::SimulationConfig;
//! use inventory_sim::simulation::engine::run_seeded;
//! use inventory_sim::simulation::kpi::compute_kpis;
//!
//! let config = SimulationConfig::default();
//! let history = run_seeded(&config, 42);
//! assert_eq!(history.len(), config.horizon_days);
//! let kpis = compute_kpis(&history);
//! assert!(kpis.total_cost >= 0);
//! ```

pub mod error;
pub mod io;
pub mod model;
pub mod simulation;
pub mod strategy;

pub use error::{SimError, SimResult};
