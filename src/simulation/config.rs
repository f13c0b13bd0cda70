// src/simulation/config.rs

use crate::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Shape of the demand curve over the horizon.
///
/// Each variant carries its own parameters; the `Volatile` walk keeps its
/// running multiplier in [`crate::io::demand::PatternState`], not here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DemandPattern {
    /// Flat demand, factor 1.0.
    Stable,
    /// Sinusoidal cycle: `1 + amplitude * sin(2π * step / period_days)`.
    Seasonal { amplitude: f64, period_days: f64 },
    /// Linear ramp: `1 + growth * step / horizon_days`.
    Trending { growth: f64 },
    /// Bounded random walk of the demand multiplier.
    Volatile {
        max_step: f64,
        floor: f64,
        ceiling: f64,
    },
}

impl DemandPattern {
    pub fn seasonal() -> Self {
        Self::Seasonal {
            amplitude: 0.3,
            period_days: 60.0,
        }
    }

    pub fn trending() -> Self {
        Self::Trending { growth: 0.4 }
    }

    pub fn volatile() -> Self {
        Self::Volatile {
            max_step: 0.15,
            floor: 0.5,
            ceiling: 1.5,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Seasonal { .. } => "seasonal",
            Self::Trending { .. } => "trending",
            Self::Volatile { .. } => "volatile",
        }
    }
}

impl fmt::Display for DemandPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DemandPattern {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stable" => Ok(Self::Stable),
            "seasonal" => Ok(Self::seasonal()),
            "trending" => Ok(Self::trending()),
            "volatile" => Ok(Self::volatile()),
            other => Err(SimError::UnknownPattern(other.to_string())),
        }
    }
}

/// Named demand-uncertainty presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UncertaintyLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl UncertaintyLevel {
    /// Returns `(variance fraction, shock probability)`.
    pub fn parameters(self) -> (f64, f64) {
        match self {
            Self::Low => (0.10, 0.02),
            Self::Medium => (0.25, 0.05),
            Self::High => (0.40, 0.10),
            Self::VeryHigh => (0.60, 0.15),
        }
    }
}

impl FromStr for UncertaintyLevel {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "very-high" | "very_high" | "veryhigh" => Ok(Self::VeryHigh),
            other => Err(SimError::UnknownUncertainty(other.to_string())),
        }
    }
}

/// Parameters of a single run. Treated as immutable once the run starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // Lead time bounds, in days (inclusive)
    pub min_lead_time: usize,
    pub max_lead_time: usize,

    // Warehouse scale
    pub max_capacity: u32,
    pub max_demand: u32,

    // Unit costs
    pub holding_cost: f64,
    pub stockout_cost: f64,
    pub purchase_cost: f64,
    pub fixed_order_cost: f64,

    // Demand profile
    pub base_weekday_demand: u32,
    pub weekend_ratio: f64,
    pub demand_variance: f64,
    pub demand_shock_prob: f64,
    pub demand_pattern: DemandPattern,

    pub horizon_days: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let (demand_variance, demand_shock_prob) = UncertaintyLevel::Medium.parameters();
        Self {
            min_lead_time: 2,
            max_lead_time: 5,
            max_capacity: 1000,
            max_demand: 500,
            holding_cost: 1.0,
            stockout_cost: 5.0,
            purchase_cost: 2.0,
            fixed_order_cost: 50.0,
            base_weekday_demand: 100,
            weekend_ratio: 0.5,
            demand_variance,
            demand_shock_prob,
            demand_pattern: DemandPattern::Stable,
            horizon_days: 180,
        }
    }
}

impl SimulationConfig {
    /// Replaces the variance and shock probability with a named preset.
    pub fn with_uncertainty(mut self, level: UncertaintyLevel) -> Self {
        let (variance, shock_prob) = level.parameters();
        self.demand_variance = variance;
        self.demand_shock_prob = shock_prob;
        self
    }

    pub fn from_json_str(json: &str) -> SimResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> SimResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Checks the preconditions the engine relies on.
    ///
    /// The engine never calls this itself: a config that fails here is a
    /// programming error if it reaches `run_simulation`.
    pub fn validate(&self) -> SimResult<()> {
        if self.min_lead_time == 0 {
            return Err(SimError::config("min lead time must be at least 1 day"));
        }
        if self.min_lead_time > self.max_lead_time {
            return Err(SimError::config(format!(
                "min lead time ({}) cannot be greater than max lead time ({})",
                self.min_lead_time, self.max_lead_time
            )));
        }
        if self.max_capacity == 0 || self.max_demand == 0 || self.base_weekday_demand == 0 {
            return Err(SimError::config("capacity and demand values must be positive"));
        }

        let costs = [
            ("holding", self.holding_cost),
            ("stockout", self.stockout_cost),
            ("purchase", self.purchase_cost),
            ("fixed order", self.fixed_order_cost),
        ];
        for (name, cost) in costs {
            if !cost.is_finite() || cost < 0.0 {
                return Err(SimError::config(format!(
                    "{} cost must be a non-negative number, got {}",
                    name, cost
                )));
            }
        }

        if self.horizon_days == 0 {
            return Err(SimError::config("horizon must be at least 1 day"));
        }
        if !self.weekend_ratio.is_finite() || self.weekend_ratio < 0.0 {
            return Err(SimError::config("weekend ratio cannot be negative"));
        }
        if !self.demand_variance.is_finite() || self.demand_variance < 0.0 {
            return Err(SimError::config("demand variance cannot be negative"));
        }
        if !(0.0..=1.0).contains(&self.demand_shock_prob) {
            return Err(SimError::config(format!(
                "shock probability must be within [0, 1], got {}",
                self.demand_shock_prob
            )));
        }

        match self.demand_pattern {
            DemandPattern::Seasonal { period_days, .. } if period_days <= 0.0 => {
                return Err(SimError::config("seasonal period must be positive"));
            }
            DemandPattern::Volatile {
                max_step,
                floor,
                ceiling,
            } if max_step < 0.0 || floor > ceiling => {
                return Err(SimError::config(
                    "volatile step must be non-negative and floor cannot exceed ceiling",
                ));
            }
            _ => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.horizon_days, 180);
        assert_eq!(config.demand_variance, 0.25);
        assert_eq!(config.demand_shock_prob, 0.05);
    }

    #[test]
    fn test_rejects_inverted_lead_times() {
        let config = SimulationConfig {
            min_lead_time: 6,
            max_lead_time: 3,
            ..SimulationConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, SimError::Config { .. }));
        assert!(err.to_string().contains("min lead time"));
    }

    #[test]
    fn test_rejects_negative_costs_and_zero_capacity() {
        let negative = SimulationConfig {
            purchase_cost: -1.0,
            ..SimulationConfig::default()
        };
        assert!(negative.validate().is_err());

        let empty = SimulationConfig {
            max_capacity: 0,
            ..SimulationConfig::default()
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_uncertainty_presets() {
        assert_eq!(UncertaintyLevel::Low.parameters(), (0.10, 0.02));
        assert_eq!(UncertaintyLevel::VeryHigh.parameters(), (0.60, 0.15));

        let config = SimulationConfig::default().with_uncertainty(UncertaintyLevel::High);
        assert_eq!(config.demand_variance, 0.40);
        assert_eq!(config.demand_shock_prob, 0.10);

        assert_eq!("very-high".parse::<UncertaintyLevel>().unwrap(), UncertaintyLevel::VeryHigh);
        assert!("extreme".parse::<UncertaintyLevel>().is_err());
    }

    #[test]
    fn test_pattern_names_round_trip() {
        for name in ["stable", "seasonal", "trending", "volatile"] {
            let pattern: DemandPattern = name.parse().unwrap();
            assert_eq!(pattern.to_string(), name);
        }
        assert!(matches!(
            "weekly".parse::<DemandPattern>(),
            Err(SimError::UnknownPattern(_))
        ));
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let json = r#"{
            "horizon_days": 30,
            "demand_pattern": { "kind": "seasonal", "amplitude": 0.5, "period_days": 30.0 }
        }"#;
        let config = SimulationConfig::from_json_str(json).unwrap();
        assert_eq!(config.horizon_days, 30);
        assert_eq!(config.max_capacity, 1000);
        assert_eq!(
            config.demand_pattern,
            DemandPattern::Seasonal {
                amplitude: 0.5,
                period_days: 30.0
            }
        );
    }

    #[test]
    fn test_json_is_validated() {
        let json = r#"{ "min_lead_time": 4, "max_lead_time": 2 }"#;
        assert!(SimulationConfig::from_json_str(json).is_err());
    }
}
