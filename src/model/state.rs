// src/model/state.rs

use crate::io::demand::PatternState;
use crate::model::queues::DeliveryPipeline;
use crate::simulation::config::SimulationConfig;
use serde::Serialize;

pub const DAYS_PER_WEEK: u8 = 7;

/// Days 5 and 6 of the cycle are the weekend.
pub const FIRST_WEEKEND_DAY: u8 = 5;

/// The state of the warehouse at the start of a day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimState {
    /// Day of week, 0..=6.
    pub day_of_week: u8,
    /// Days simulated so far.
    pub step: usize,
    pub inventory: u32,
    /// Yesterday's realized demand, the policy's only demand signal.
    pub prev_demand: u32,
    pub pipeline: DeliveryPipeline,
    pub pattern: PatternState,
}

impl SimState {
    /// Fresh state for a run: about five days of stock on hand and an empty pipeline.
    pub fn initial(config: &SimulationConfig) -> Self {
        let inventory = config
            .base_weekday_demand
            .saturating_mul(5)
            .min(config.max_capacity);

        Self {
            day_of_week: 0,
            step: 0,
            inventory,
            prev_demand: config.base_weekday_demand,
            pipeline: DeliveryPipeline::new(config.max_lead_time),
            pattern: PatternState::for_pattern(&config.demand_pattern),
        }
    }

    pub fn is_weekend(&self) -> bool {
        self.day_of_week >= FIRST_WEEKEND_DAY
    }

    /// On-hand stock plus everything still in the pipeline.
    pub fn projected_inventory(&self) -> u64 {
        u64::from(self.inventory) + self.pipeline.total()
    }
}
