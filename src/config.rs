//! Engine configuration
//!
//! Handles loading and validating JSON configuration files for the
//! signal engine and its filter chain.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration rejected at load time
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("initial_period must be positive")]
    NonPositiveInitialPeriod,

    #[error("max_period must be positive")]
    NonPositiveMaxPeriod,

    #[error("initial_period ({initial}) must not exceed max_period ({max})")]
    InitialExceedsMax { initial: usize, max: usize },

    #[error("history_multiplier must be positive")]
    NonPositiveHistoryMultiplier,

    #[error("spread_filter must be non-negative, got {0}")]
    NegativeSpreadFilter(f64),
}

/// Per-filter enable flags
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterToggles {
    pub trend: bool,
    pub oscillator_cross: bool,
    pub level: bool,
    pub directional: bool,
    pub fractal_block: bool,
    pub reversal_spike: bool,
}

impl Default for FilterToggles {
    fn default() -> Self {
        FilterToggles {
            trend: false,
            oscillator_cross: false,
            level: false,
            directional: false,
            fractal_block: false,
            reversal_spike: true,
        }
    }
}

/// Main engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Search candidate sampling periods each bar instead of using
    /// `initial_period` as a fixed value
    pub auto_select_period: bool,
    /// Fixed sampling period, or the selection fallback when adaptive
    pub initial_period: usize,
    /// Search ceiling for adaptive period selection
    pub max_period: usize,
    /// Shifts sampled per period = `period * history_multiplier`,
    /// capped by available history
    pub history_multiplier: usize,
    /// A possibility must strictly exceed this to count as a success
    pub spread_filter: f64,
    /// Mid-average multiple above which the reversal-spike filter fires
    pub reversal_index: f64,
    /// Fractal window width; even values rounded up, minimum 5
    pub fractal_depth: usize,
    /// Permanently suppress the buy side
    pub block_buy: bool,
    /// Permanently suppress the sell side
    pub block_sell: bool,
    pub filters: FilterToggles,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            auto_select_period: true,
            initial_period: 5,
            max_period: 20,
            history_multiplier: 3,
            spread_filter: 0.0,
            reversal_index: 3.0,
            fractal_depth: 5,
            block_buy: false,
            block_sell: false,
            filters: FilterToggles::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).context("Failed to read config file")?;
        let config: EngineConfig =
            serde_json::from_str(&contents).context("Failed to parse config JSON")?;
        config.validate().context("Invalid engine configuration")?;
        Ok(config)
    }

    /// Reject impossible parameter combinations
    ///
    /// The fractal width is deliberately not validated here; it is
    /// auto-corrected to the next odd value >= 5 instead.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_period == 0 {
            return Err(ConfigError::NonPositiveInitialPeriod);
        }
        if self.max_period == 0 {
            return Err(ConfigError::NonPositiveMaxPeriod);
        }
        if self.initial_period > self.max_period {
            return Err(ConfigError::InitialExceedsMax {
                initial: self.initial_period,
                max: self.max_period,
            });
        }
        if self.history_multiplier == 0 {
            return Err(ConfigError::NonPositiveHistoryMultiplier);
        }
        if self.spread_filter < 0.0 {
            return Err(ConfigError::NegativeSpreadFilter(self.spread_filter));
        }
        Ok(())
    }

    /// Fractal window width normalized to an odd value >= 5
    pub fn fractal_width(&self) -> usize {
        let width = self.fractal_depth.max(5);
        if width % 2 == 0 {
            width + 1
        } else {
            width
        }
    }

    /// History store capacity covering the deepest sample any candidate
    /// period can request, plus slack for the fractal window
    pub fn history_capacity(&self) -> usize {
        self.max_period.max(self.initial_period) * (self.history_multiplier + 2) + 2
    }
}
