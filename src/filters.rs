//! Confirmation filter chain
//!
//! An ordered list of pure stages folded left-to-right into a
//! [`FilterOutcome`]. Each optional stage is gated by its toggle and
//! may suppress the buy side, the sell side, or (in the reversal stage
//! only) flip both suppression flags. The stage order is a contract:
//! the reversal-spike stage always runs last.

use crate::config::EngineConfig;
use crate::{EngineState, FilterOutcome, FractalDirection, IndicatorSnapshot, PeriodStatistics};

/// Read-only inputs shared by every filter stage
#[derive(Debug, Clone, Copy)]
pub struct FilterContext<'a> {
    pub config: &'a EngineConfig,
    pub state: &'a EngineState,
    /// Statistics of the period selected this bar
    pub stats: &'a PeriodStatistics,
    pub fractal: FractalDirection,
    pub indicators: &'a IndicatorSnapshot,
}

/// One pure filter stage
pub type FilterStage = fn(&FilterContext, FilterOutcome) -> FilterOutcome;

/// Stage order; `reversal_spike` must stay last because it inverts the
/// suppression flags accumulated by everything before it
pub const STAGES: &[FilterStage] = &[
    hard_overrides,
    statistical_core,
    trend,
    oscillator_cross,
    level,
    directional_movement,
    fractal_block,
    reversal_spike,
];

/// Fold every stage into the outcome for this bar
pub fn run(ctx: &FilterContext) -> FilterOutcome {
    STAGES
        .iter()
        .fold(FilterOutcome::default(), |outcome, stage| {
            stage(ctx, outcome)
        })
}

/// Operator-configured permanent side blocks
pub fn hard_overrides(ctx: &FilterContext, mut outcome: FilterOutcome) -> FilterOutcome {
    if ctx.config.block_buy {
        outcome.block_buy_hard = true;
    }
    if ctx.config.block_sell {
        outcome.block_sell_hard = true;
    }
    outcome
}

/// Self-consistency filter over the statistical core; always active
///
/// Compares the possibility-weighted scores of both sides. A growing
/// sampling period disables the weaker side unless its success-weighted
/// score still beats the other side; a shrinking period or an exact
/// score tie disables both. Independently, a side whose latest
/// possibility exceeds twice its own success-mid average is treated as
/// an outlier and disabled.
pub fn statistical_core(ctx: &FilterContext, mut outcome: FilterOutcome) -> FilterOutcome {
    let stats = ctx.stats;
    let left = stats.sell_possibility_mid * stats.sell_quality as f64;
    let right = stats.buy_possibility_mid * stats.buy_quality as f64;
    let left_suc = stats.sell_suc_possibility_mid * stats.sell_suc_quality as f64;
    let right_suc = stats.buy_suc_possibility_mid * stats.buy_suc_quality as f64;

    if ctx.state.current_period > ctx.state.previous_period {
        if left < right {
            outcome.disable_sell = true;
            if left_suc > right_suc {
                outcome.disable_sell = false;
            }
        } else if right < left {
            outcome.disable_buy = true;
            if right_suc > left_suc {
                outcome.disable_buy = false;
            }
        }
    } else if ctx.state.current_period < ctx.state.previous_period {
        outcome.disable_buy = true;
        outcome.disable_sell = true;
    }

    if left == right {
        outcome.disable_buy = true;
        outcome.disable_sell = true;
    }

    // Outlier guard: a spike far above the side's own success average
    // is noise, not signal
    if stats.sell_possibility > 2.0 * stats.sell_suc_possibility_mid {
        outcome.disable_sell = true;
    }
    if stats.buy_possibility > 2.0 * stats.buy_suc_possibility_mid {
        outcome.disable_buy = true;
    }

    outcome
}

/// Rising slow smoothing line disables sell; falling disables buy
pub fn trend(ctx: &FilterContext, mut outcome: FilterOutcome) -> FilterOutcome {
    if !ctx.config.filters.trend {
        return outcome;
    }
    if let Some(sample) = ctx.indicators.trend {
        if sample.current > sample.previous {
            outcome.disable_sell = true;
        } else if sample.current < sample.previous {
            outcome.disable_buy = true;
        }
    }
    outcome
}

/// Fast oscillator above slow disables sell; below disables buy
pub fn oscillator_cross(ctx: &FilterContext, mut outcome: FilterOutcome) -> FilterOutcome {
    if !ctx.config.filters.oscillator_cross {
        return outcome;
    }
    if let Some(pair) = ctx.indicators.oscillator {
        if pair.fast > pair.slow {
            outcome.disable_sell = true;
        } else if pair.fast < pair.slow {
            outcome.disable_buy = true;
        }
    }
    outcome
}

/// Bounded oscillator below -100 disables sell; above +100 disables buy
pub fn level(ctx: &FilterContext, mut outcome: FilterOutcome) -> FilterOutcome {
    if !ctx.config.filters.level {
        return outcome;
    }
    if let Some(value) = ctx.indicators.level {
        if value < -100.0 {
            outcome.disable_sell = true;
        } else if value > 100.0 {
            outcome.disable_buy = true;
        }
    }
    outcome
}

/// Plus-DM above minus-DM disables sell; minus above plus disables buy
pub fn directional_movement(ctx: &FilterContext, mut outcome: FilterOutcome) -> FilterOutcome {
    if !ctx.config.filters.directional {
        return outcome;
    }
    if let Some(pair) = ctx.indicators.directional {
        if pair.plus > pair.minus {
            outcome.disable_sell = true;
        } else if pair.minus > pair.plus {
            outcome.disable_buy = true;
        }
    }
    outcome
}

/// A confirmed swing extreme hard-blocks the opposing side, overriding
/// even the statistical core
pub fn fractal_block(ctx: &FilterContext, mut outcome: FilterOutcome) -> FilterOutcome {
    if !ctx.config.filters.fractal_block {
        return outcome;
    }
    match ctx.fractal {
        FractalDirection::Up => outcome.block_buy_hard = true,
        FractalDirection::Down => outcome.block_sell_hard = true,
        FractalDirection::None => {}
    }
    outcome
}

/// Reversal-spike stage; runs last
///
/// When either side's latest possibility exceeds its own mid average
/// times `reversal_index`, both suppression flags are inverted for this
/// bar only. Hard blocks are untouched.
pub fn reversal_spike(ctx: &FilterContext, mut outcome: FilterOutcome) -> FilterOutcome {
    if !ctx.config.filters.reversal_spike {
        return outcome;
    }
    let stats = ctx.stats;
    let index = ctx.config.reversal_index;
    let spiking = stats.sell_possibility > stats.sell_possibility_mid * index
        || stats.buy_possibility > stats.buy_possibility_mid * index;
    if spiking {
        outcome.disable_buy = !outcome.disable_buy;
        outcome.disable_sell = !outcome.disable_sell;
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Decision, DirectionalPair, OscillatorPair, TrendSample};

    fn stats_with(period: usize) -> PeriodStatistics {
        PeriodStatistics {
            period,
            window: 4,
            decision: Decision::Undefined,
            buy_possibility: 0.0,
            sell_possibility: 0.0,
            undefined_possibility: 0.0,
            buy_possibility_mid: 0.0,
            sell_possibility_mid: 0.0,
            undefined_possibility_mid: 0.0,
            buy_suc_possibility_mid: 0.0,
            sell_suc_possibility_mid: 0.0,
            undefined_suc_possibility_mid: 0.0,
            buy_quality: 0,
            sell_quality: 0,
            undefined_quality: 0,
            buy_suc_quality: 0,
            sell_suc_quality: 0,
            undefined_suc_quality: 0,
            possibility_quality: 0.0,
            possibility_success_quality: 0.0,
        }
    }

    fn state_with(current: usize, previous: usize) -> EngineState {
        EngineState {
            current_period: current,
            previous_period: previous,
            current_window_size: 4,
            active: None,
        }
    }

    struct Fixture {
        config: EngineConfig,
        state: EngineState,
        stats: PeriodStatistics,
        indicators: IndicatorSnapshot,
        fractal: FractalDirection,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                config: EngineConfig::default(),
                state: state_with(5, 5),
                stats: stats_with(5),
                indicators: IndicatorSnapshot::default(),
                fractal: FractalDirection::None,
            }
        }

        fn ctx(&self) -> FilterContext<'_> {
            FilterContext {
                config: &self.config,
                state: &self.state,
                stats: &self.stats,
                fractal: self.fractal,
                indicators: &self.indicators,
            }
        }
    }

    #[test]
    fn test_reversal_stage_is_last() {
        let last = *STAGES.last().unwrap();
        assert_eq!(last as usize, reversal_spike as FilterStage as usize);
    }

    #[test]
    fn test_hard_overrides() {
        let mut fixture = Fixture::new();
        fixture.config.block_buy = true;
        let outcome = hard_overrides(&fixture.ctx(), FilterOutcome::default());
        assert!(outcome.block_buy_hard);
        assert!(!outcome.block_sell_hard);
    }

    #[test]
    fn test_core_period_growth_disables_weaker_side() {
        let mut fixture = Fixture::new();
        fixture.state = state_with(6, 5);
        // Buy side scores higher: right = 2.0, left = 0.5
        fixture.stats.buy_possibility_mid = 1.0;
        fixture.stats.buy_quality = 2;
        fixture.stats.sell_possibility_mid = 0.5;
        fixture.stats.sell_quality = 1;

        let outcome = statistical_core(&fixture.ctx(), FilterOutcome::default());
        assert!(outcome.disable_sell);
        assert!(!outcome.disable_buy);
    }

    #[test]
    fn test_core_success_score_reenables_weaker_side() {
        let mut fixture = Fixture::new();
        fixture.state = state_with(6, 5);
        fixture.stats.buy_possibility_mid = 1.0;
        fixture.stats.buy_quality = 2;
        fixture.stats.sell_possibility_mid = 0.5;
        fixture.stats.sell_quality = 1;
        // Sell side wins on success-weighted scores
        fixture.stats.sell_suc_possibility_mid = 3.0;
        fixture.stats.sell_suc_quality = 2;
        fixture.stats.buy_suc_possibility_mid = 1.0;
        fixture.stats.buy_suc_quality = 1;

        let outcome = statistical_core(&fixture.ctx(), FilterOutcome::default());
        assert!(!outcome.disable_sell);
    }

    #[test]
    fn test_core_period_shrink_disables_both() {
        let mut fixture = Fixture::new();
        fixture.state = state_with(4, 5);
        fixture.stats.buy_possibility_mid = 1.0;
        fixture.stats.buy_quality = 2;
        fixture.stats.sell_possibility_mid = 0.5;
        fixture.stats.sell_quality = 1;

        let outcome = statistical_core(&fixture.ctx(), FilterOutcome::default());
        assert!(outcome.disable_buy);
        assert!(outcome.disable_sell);
    }

    #[test]
    fn test_core_equal_scores_disable_both() {
        let mut fixture = Fixture::new();
        fixture.stats.buy_possibility_mid = 1.0;
        fixture.stats.buy_quality = 1;
        fixture.stats.sell_possibility_mid = 1.0;
        fixture.stats.sell_quality = 1;

        let outcome = statistical_core(&fixture.ctx(), FilterOutcome::default());
        assert!(outcome.disable_buy);
        assert!(outcome.disable_sell);
    }

    #[test]
    fn test_core_outlier_guard() {
        let mut fixture = Fixture::new();
        // Unequal scores, stable period: only the outlier rule can fire
        fixture.stats.buy_possibility_mid = 1.0;
        fixture.stats.buy_quality = 2;
        fixture.stats.sell_possibility_mid = 0.5;
        fixture.stats.sell_quality = 1;
        fixture.stats.buy_suc_possibility_mid = 1.0;
        fixture.stats.buy_possibility = 2.5; // > 2 * 1.0

        let outcome = statistical_core(&fixture.ctx(), FilterOutcome::default());
        assert!(outcome.disable_buy);
        assert!(!outcome.disable_sell);
    }

    #[test]
    fn test_trend_filter() {
        let mut fixture = Fixture::new();
        fixture.config.filters.trend = true;
        fixture.indicators.trend = Some(TrendSample {
            current: 101.0,
            previous: 100.0,
        });
        let outcome = trend(&fixture.ctx(), FilterOutcome::default());
        assert!(outcome.disable_sell);
        assert!(!outcome.disable_buy);

        fixture.indicators.trend = Some(TrendSample {
            current: 99.0,
            previous: 100.0,
        });
        let outcome = trend(&fixture.ctx(), FilterOutcome::default());
        assert!(outcome.disable_buy);
        assert!(!outcome.disable_sell);
    }

    #[test]
    fn test_disabled_or_missing_input_is_noop() {
        let mut fixture = Fixture::new();
        // Toggle off, value present
        fixture.indicators.trend = Some(TrendSample {
            current: 101.0,
            previous: 100.0,
        });
        assert_eq!(
            trend(&fixture.ctx(), FilterOutcome::default()),
            FilterOutcome::default()
        );

        // Toggle on, value absent
        fixture.config.filters.oscillator_cross = true;
        fixture.indicators.oscillator = None;
        assert_eq!(
            oscillator_cross(&fixture.ctx(), FilterOutcome::default()),
            FilterOutcome::default()
        );
    }

    #[test]
    fn test_oscillator_and_directional_filters() {
        let mut fixture = Fixture::new();
        fixture.config.filters.oscillator_cross = true;
        fixture.config.filters.directional = true;

        fixture.indicators.oscillator = Some(OscillatorPair {
            fast: 80.0,
            slow: 60.0,
        });
        let outcome = oscillator_cross(&fixture.ctx(), FilterOutcome::default());
        assert!(outcome.disable_sell);

        fixture.indicators.directional = Some(DirectionalPair {
            plus: 10.0,
            minus: 25.0,
        });
        let outcome = directional_movement(&fixture.ctx(), FilterOutcome::default());
        assert!(outcome.disable_buy);
    }

    #[test]
    fn test_level_filter_bounds() {
        let mut fixture = Fixture::new();
        fixture.config.filters.level = true;

        fixture.indicators.level = Some(-150.0);
        assert!(level(&fixture.ctx(), FilterOutcome::default()).disable_sell);

        fixture.indicators.level = Some(150.0);
        assert!(level(&fixture.ctx(), FilterOutcome::default()).disable_buy);

        fixture.indicators.level = Some(50.0);
        assert_eq!(
            level(&fixture.ctx(), FilterOutcome::default()),
            FilterOutcome::default()
        );
    }

    #[test]
    fn test_fractal_block_hard_blocks_opposing_side() {
        let mut fixture = Fixture::new();
        fixture.config.filters.fractal_block = true;

        fixture.fractal = FractalDirection::Up;
        let outcome = fractal_block(&fixture.ctx(), FilterOutcome::default());
        assert!(outcome.block_buy_hard);
        assert!(!outcome.block_sell_hard);

        fixture.fractal = FractalDirection::Down;
        let outcome = fractal_block(&fixture.ctx(), FilterOutcome::default());
        assert!(outcome.block_sell_hard);
    }

    #[test]
    fn test_reversal_spike_negates_disable_flags() {
        let mut fixture = Fixture::new();
        fixture.config.reversal_index = 2.0;
        fixture.stats.buy_possibility = 5.0;
        fixture.stats.buy_possibility_mid = 1.0; // 5.0 > 1.0 * 2.0

        for (disable_buy, disable_sell) in
            [(false, false), (true, false), (false, true), (true, true)]
        {
            let before = FilterOutcome {
                disable_buy,
                disable_sell,
                block_buy_hard: true,
                block_sell_hard: false,
            };
            let after = reversal_spike(&fixture.ctx(), before);
            // Pure boolean negation of both disable flags
            assert_eq!(after.disable_buy, !before.disable_buy);
            assert_eq!(after.disable_sell, !before.disable_sell);
            // Hard blocks untouched
            assert_eq!(after.block_buy_hard, before.block_buy_hard);
            assert_eq!(after.block_sell_hard, before.block_sell_hard);
        }
    }

    #[test]
    fn test_reversal_spike_quiet_bar_is_noop() {
        let mut fixture = Fixture::new();
        fixture.stats.buy_possibility = 1.0;
        fixture.stats.buy_possibility_mid = 1.0;
        fixture.stats.sell_possibility = 0.5;
        fixture.stats.sell_possibility_mid = 1.0;

        let before = FilterOutcome {
            disable_buy: true,
            ..Default::default()
        };
        assert_eq!(reversal_spike(&fixture.ctx(), before), before);
    }
}
