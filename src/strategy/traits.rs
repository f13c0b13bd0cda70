// src/strategy/traits.rs

use crate::model::state::SimState;
use crate::simulation::config::SimulationConfig;
use std::fmt::Debug;

/// Decides how much to order from the supplier at the start of a day.
///
/// Implementations must be pure: the same state and config always yield the
/// same quantity, and nothing is mutated. `Send + Sync` lets a single policy
/// be shared across parallel sweep runs.
pub trait OrderPolicy: Debug + Send + Sync {
    /// Returns an order quantity in `[0, config.max_capacity]`.
    fn calculate_order(&self, state: &SimState, config: &SimulationConfig) -> u32;
}
