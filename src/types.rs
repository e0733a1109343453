//! Core data types used across the signal engine

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for bar data
#[derive(Debug, Error)]
pub enum BarValidationError {
    #[error("high ({high}) must be >= low ({low})")]
    HighLessThanLow { high: f64, low: f64 },

    #[error("open ({open}) must be between low ({low}) and high ({high})")]
    OpenOutOfRange { open: f64, low: f64, high: f64 },

    #[error("close ({close}) must be between low ({low}) and high ({high})")]
    CloseOutOfRange { close: f64, low: f64, high: f64 },

    #[error("prices must be positive: open={open}, high={high}, low={low}, close={close}")]
    NonPositivePrice {
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    },
}

/// OHLC bar snapshot
///
/// Immutable once appended to the history store. Timestamps and volume
/// stay with the feed layer; the engine only reads prices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    /// Create a new bar with validation
    pub fn new(open: f64, high: f64, low: f64, close: f64) -> Result<Self, BarValidationError> {
        let bar = Self {
            open,
            high,
            low,
            close,
        };
        bar.validate()?;
        Ok(bar)
    }

    /// Create a bar without validation (for trusted sources and tests)
    pub fn new_unchecked(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            open,
            high,
            low,
            close,
        }
    }

    /// Validate the bar data
    pub fn validate(&self) -> Result<(), BarValidationError> {
        if self.open <= 0.0 || self.high <= 0.0 || self.low <= 0.0 || self.close <= 0.0 {
            return Err(BarValidationError::NonPositivePrice {
                open: self.open,
                high: self.high,
                low: self.low,
                close: self.close,
            });
        }

        if self.high < self.low {
            return Err(BarValidationError::HighLessThanLow {
                high: self.high,
                low: self.low,
            });
        }

        if self.open < self.low || self.open > self.high {
            return Err(BarValidationError::OpenOutOfRange {
                open: self.open,
                low: self.low,
                high: self.high,
            });
        }

        if self.close < self.low || self.close > self.high {
            return Err(BarValidationError::CloseOutOfRange {
                close: self.close,
                low: self.low,
                high: self.high,
            });
        }

        Ok(())
    }

    /// Body move: `close - open`. Sign indicates intrabar pressure.
    pub fn body(&self) -> f64 {
        self.close - self.open
    }
}

/// Tentative decision for one sampled shift or one aggregated period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Buy,
    Sell,
    Undefined,
}

/// Final per-bar directive handed to the order-execution collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinalDecision {
    Buy,
    Sell,
    /// Keep whatever position is open; no change this bar.
    Hold,
    /// Close any open position; the model sees no tradable structure.
    Flatten,
}

/// Latched swing-extreme direction from the fractal detector
///
/// `None` until the first extreme is confirmed. The latch is only ever
/// overwritten by a new extreme, never cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FractalDirection {
    #[default]
    None,
    Up,
    Down,
}

/// One contrarian sample: the body-move sign pattern of two bars one
/// sampling period apart
///
/// Exactly one of the three possibility magnitudes is non-zero, except
/// for a zero body move where all three are zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PossibilityResult {
    pub decision: Decision,
    pub buy_possibility: f64,
    pub sell_possibility: f64,
    pub undefined_possibility: f64,
    pub decision_value: f64,
    pub previous_decision_value: f64,
}

/// Aggregated statistics for one candidate sampling period
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodStatistics {
    /// Candidate period these statistics were sampled with
    pub period: usize,
    /// Number of shifts sampled
    pub window: usize,

    /// Shift-0 snapshot
    pub decision: Decision,
    pub buy_possibility: f64,
    pub sell_possibility: f64,
    pub undefined_possibility: f64,

    /// Averages over all sampled shifts
    pub buy_possibility_mid: f64,
    pub sell_possibility_mid: f64,
    pub undefined_possibility_mid: f64,

    /// Averages restricted to shifts exceeding the spread filter
    pub buy_suc_possibility_mid: f64,
    pub sell_suc_possibility_mid: f64,
    pub undefined_suc_possibility_mid: f64,

    /// Raw per-class hit counters
    pub buy_quality: u32,
    pub sell_quality: u32,
    pub undefined_quality: u32,

    /// Per-class counters restricted to shifts exceeding the spread filter
    pub buy_suc_quality: u32,
    pub sell_suc_quality: u32,
    pub undefined_suc_quality: u32,

    /// Share of directional hits among all sampled shifts, in [0, 1]
    pub possibility_quality: f64,
    /// Share of directional hits among spread-filtered shifts, in [0, 1]
    pub possibility_success_quality: f64,
}

/// Mutable per-instrument engine state, updated once per bar
#[derive(Debug, Clone, Default)]
pub struct EngineState {
    pub current_period: usize,
    pub previous_period: usize,
    pub current_window_size: usize,
    pub active: Option<PeriodStatistics>,
}

/// Suppression flags produced by the filter chain; rebuilt every bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterOutcome {
    pub disable_buy: bool,
    pub disable_sell: bool,
    pub block_buy_hard: bool,
    pub block_sell_hard: bool,
}

impl FilterOutcome {
    pub fn allow_buy(&self) -> bool {
        !self.disable_buy && !self.block_buy_hard
    }

    pub fn allow_sell(&self) -> bool {
        !self.disable_sell && !self.block_sell_hard
    }
}

/// Two-point sample of the slow smoothing line used by the trend filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendSample {
    pub current: f64,
    pub previous: f64,
}

/// Fast/slow oscillator pair for the crossover filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorPair {
    pub fast: f64,
    pub slow: f64,
}

/// Plus/minus directional-movement pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalPair {
    pub plus: f64,
    pub minus: f64,
}

/// Pre-computed indicator values for the enabled filters
///
/// Indicator formulas are the feed layer's concern; the engine only
/// consumes their latest numeric outputs. An absent value means the
/// corresponding filter contributes nothing this bar.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IndicatorSnapshot {
    pub trend: Option<TrendSample>,
    pub oscillator: Option<OscillatorPair>,
    pub level: Option<f64>,
    pub directional: Option<DirectionalPair>,
}

/// Per-bar engine output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarVerdict {
    pub decision: FinalDecision,
    /// Diagnostic confidence score of the active period, in [0, 1]
    pub success_quality: f64,
}
