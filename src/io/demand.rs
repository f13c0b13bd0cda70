// src/io/demand.rs

use crate::model::state::{SimState, FIRST_WEEKEND_DAY};
use crate::simulation::config::{DemandPattern, SimulationConfig};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::Serialize;
use std::f64::consts::PI;

/// Probability that a shock is a spike rather than a drop.
const SHOCK_SPIKE_PROB: f64 = 0.7;
const SHOCK_MAGNITUDE_MIN: f64 = 1.5;
const SHOCK_MAGNITUDE_MAX: f64 = 2.5;
/// A drop scales the shock magnitude by this factor before it is applied.
const SHOCK_DROP_SCALE: f64 = -0.5;

/// Per-run memory of the demand pattern.
///
/// Only the volatile walk needs any; every other pattern is a pure function
/// of the step counter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PatternState {
    Static,
    Volatile { multiplier: f64 },
}

impl PatternState {
    pub fn for_pattern(pattern: &DemandPattern) -> Self {
        match pattern {
            DemandPattern::Volatile { .. } => Self::Volatile { multiplier: 1.0 },
            _ => Self::Static,
        }
    }
}

/// Weekdays count fully, weekend days are scaled by the configured ratio.
pub fn day_of_week_factor(day_of_week: u8, weekend_ratio: f64) -> f64 {
    if day_of_week >= FIRST_WEEKEND_DAY {
        weekend_ratio
    } else {
        1.0
    }
}

/// Pattern multiplier for the given step. Advances the volatile walk as a side effect.
pub fn pattern_factor<R: Rng>(
    pattern: &DemandPattern,
    pattern_state: &mut PatternState,
    step: usize,
    horizon_days: usize,
    rng: &mut R,
) -> f64 {
    match *pattern {
        DemandPattern::Stable => 1.0,
        DemandPattern::Seasonal {
            amplitude,
            period_days,
        } => {
            if period_days <= 0.0 {
                return 1.0;
            }
            1.0 + amplitude * (2.0 * PI * step as f64 / period_days).sin()
        }
        DemandPattern::Trending { growth } => {
            if horizon_days == 0 {
                return 1.0;
            }
            1.0 + growth * (step as f64 / horizon_days as f64)
        }
        DemandPattern::Volatile {
            max_step,
            floor,
            ceiling,
        } => {
            let current = match *pattern_state {
                PatternState::Volatile { multiplier } => multiplier,
                PatternState::Static => 1.0,
            };
            let max_step = max_step.abs();
            let change = rng.gen_range(-max_step..=max_step);
            let next = (current + change).max(floor).min(ceiling);
            *pattern_state = PatternState::Volatile { multiplier: next };
            next
        }
    }
}

/// Draws one day of customer demand.
///
/// Day-of-week factor, then pattern factor, then additive normal noise,
/// then a multiplicative shock, then the clamp. The order matters for the
/// output distribution.
pub fn generate_demand<R: Rng>(state: &mut SimState, config: &SimulationConfig, rng: &mut R) -> u32 {
    let day_factor = day_of_week_factor(state.day_of_week, config.weekend_ratio);
    let trend = pattern_factor(
        &config.demand_pattern,
        &mut state.pattern,
        state.step,
        config.horizon_days,
        rng,
    );

    let base_demand = f64::from(config.base_weekday_demand) * day_factor * trend;

    // Noise scales with the day's base level
    let std_dev = base_demand * config.demand_variance;
    let z: f64 = StandardNormal.sample(rng);
    let mut demand = base_demand + z * std_dev;

    if rng.gen::<f64>() < config.demand_shock_prob {
        let is_spike = rng.gen::<f64>() < SHOCK_SPIKE_PROB;
        let magnitude = rng.gen_range(SHOCK_MAGNITUDE_MIN..SHOCK_MAGNITUDE_MAX);
        // A drop turns the factor negative, so the clamp below floors it at 0
        demand *= if is_spike {
            magnitude
        } else {
            magnitude * SHOCK_DROP_SCALE
        };
    }

    let ceiling = f64::from(config.max_demand);
    if !demand.is_finite() {
        return 0;
    }
    demand.max(0.0).min(ceiling).round() as u32
}
