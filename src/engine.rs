//! Per-bar engine orchestration
//!
//! Wires the history store, fractal detector, period selector, and
//! filter chain together and composes the final directive for each bar.

use tracing::debug;

use crate::config::{ConfigError, EngineConfig};
use crate::filters::{self, FilterContext};
use crate::fractal::FractalDetector;
use crate::history::BarHistory;
use crate::selector;
use crate::{
    Bar, BarVerdict, Decision, EngineState, FilterOutcome, FinalDecision, FractalDirection,
    IndicatorSnapshot,
};

/// Combine the statistical decision with the filter chain outcome
///
/// Buy and Sell pass through only when their side is neither disabled
/// nor hard-blocked. An Undefined decision with a success quality below
/// 0.5 flattens any open position; everything else holds. Stateless.
pub fn compose(
    statistical: Decision,
    outcome: FilterOutcome,
    success_quality: f64,
) -> FinalDecision {
    if statistical == Decision::Buy && outcome.allow_buy() {
        FinalDecision::Buy
    } else if statistical == Decision::Sell && outcome.allow_sell() {
        FinalDecision::Sell
    } else if statistical == Decision::Undefined && success_quality < 0.5 {
        FinalDecision::Flatten
    } else {
        FinalDecision::Hold
    }
}

/// One decision engine instance for one instrument
///
/// Owns all mutable state; synchronous and deterministic. The caller
/// must deliver fully-closed bars one at a time in chronological order.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    history: BarHistory,
    fractal: FractalDetector,
    state: EngineState,
}

impl Engine {
    /// Create an engine, rejecting invalid configuration
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let history = BarHistory::new(config.history_capacity());
        let fractal = FractalDetector::new(config.fractal_width());
        Ok(Engine {
            config,
            history,
            fractal,
            state: EngineState::default(),
        })
    }

    /// Process one finalized bar and emit the directive, if any
    ///
    /// `None` means no candidate period had enough history yet; this is
    /// abstention, not an error, and distinct from a deliberate hold.
    pub fn on_bar(&mut self, bar: Bar, indicators: &IndicatorSnapshot) -> Option<BarVerdict> {
        self.history.append(bar);
        let fractal = self.fractal.update(&self.history);

        let stats = selector::select(&self.history, &self.config, &mut self.state)?;

        let ctx = FilterContext {
            config: &self.config,
            state: &self.state,
            stats: &stats,
            fractal,
            indicators,
        };
        let outcome = filters::run(&ctx);

        let decision = compose(stats.decision, outcome, stats.possibility_success_quality);

        debug!(
            period = self.state.current_period,
            window = self.state.current_window_size,
            quality = stats.possibility_quality,
            success_quality = stats.possibility_success_quality,
            ?decision,
            "bar processed"
        );

        Some(BarVerdict {
            decision,
            success_quality: stats.possibility_success_quality,
        })
    }

    /// Sampling period selected on the last processed bar
    pub fn current_period(&self) -> usize {
        self.state.current_period
    }

    /// Latched fractal direction
    pub fn fractal_direction(&self) -> FractalDirection {
        self.fractal.direction()
    }

    /// State snapshot for diagnostics and tests
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of bars currently held by the history store
    pub fn history_depth(&self) -> usize {
        self.history.len()
    }
}
