//! Possibility sampling and per-period statistics
//!
//! The contrarian core of the engine. A "possibility" is the
//! unnormalized magnitude of a body-move sign reversal between two bars
//! one sampling period apart; a reversal is the tradable event and a
//! continuation is no signal. Sampled possibilities are reduced into
//! per-period hit-rate statistics that rank candidate periods.

use crate::{BarHistory, Decision, PeriodStatistics, PossibilityResult};

/// Derive one contrarian sample for `(period, shift)`
///
/// Reads `current = get(period * shift)` and
/// `previous = get(period * (shift + 1))`; `None` when either bar is
/// outside the stored history.
pub fn sample(history: &BarHistory, period: usize, shift: usize) -> Option<PossibilityResult> {
    let current = history.get(period * shift)?;
    let previous = history.get(period * (shift + 1))?;

    let decision_value = current.body();
    let previous_decision_value = previous.body();

    let mut result = PossibilityResult {
        decision: Decision::Undefined,
        buy_possibility: 0.0,
        sell_possibility: 0.0,
        undefined_possibility: 0.0,
        decision_value,
        previous_decision_value,
    };

    if decision_value > 0.0 {
        if previous_decision_value < 0.0 {
            // Down-then-up: fade the up move
            result.decision = Decision::Sell;
            result.sell_possibility = decision_value;
        } else {
            result.undefined_possibility = decision_value;
        }
    } else if decision_value < 0.0 {
        if previous_decision_value > 0.0 {
            // Up-then-down: fade the down move
            result.decision = Decision::Buy;
            result.buy_possibility = -decision_value;
        } else {
            result.undefined_possibility = -decision_value;
        }
    }
    // Zero body move: Undefined with all possibilities zero

    Some(result)
}

/// Safe ratio; zero denominator yields 0 rather than NaN
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Aggregate sampled possibilities for one candidate period
///
/// Unavailable (`None`) unless the store holds at least
/// `period * (history_multiplier + 1)` bars. The shift window is
/// `min(period * history_multiplier, depth / period - 1)` samples;
/// shift 0 becomes the current snapshot.
pub fn aggregate(
    history: &BarHistory,
    period: usize,
    history_multiplier: usize,
    spread_filter: f64,
) -> Option<PeriodStatistics> {
    if period == 0 || history.len() < period * (history_multiplier + 1) {
        return None;
    }

    let shifts = (period * history_multiplier).min(history.len() / period - 1);
    if shifts == 0 {
        return None;
    }

    let mut stats = PeriodStatistics {
        period,
        window: shifts,
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
    };

    let mut buy_sum = 0.0;
    let mut sell_sum = 0.0;
    let mut undefined_sum = 0.0;
    let mut buy_suc_sum = 0.0;
    let mut sell_suc_sum = 0.0;
    let mut undefined_suc_sum = 0.0;

    for shift in 0..shifts {
        let result = sample(history, period, shift)?;

        if shift == 0 {
            stats.decision = result.decision;
            stats.buy_possibility = result.buy_possibility;
            stats.sell_possibility = result.sell_possibility;
            stats.undefined_possibility = result.undefined_possibility;
        }

        match result.decision {
            Decision::Buy => stats.buy_quality += 1,
            Decision::Sell => stats.sell_quality += 1,
            Decision::Undefined => stats.undefined_quality += 1,
        }

        buy_sum += result.buy_possibility;
        sell_sum += result.sell_possibility;
        undefined_sum += result.undefined_possibility;

        if result.buy_possibility > spread_filter {
            stats.buy_suc_quality += 1;
            buy_suc_sum += result.buy_possibility;
        }
        if result.sell_possibility > spread_filter {
            stats.sell_suc_quality += 1;
            sell_suc_sum += result.sell_possibility;
        }
        if result.undefined_possibility > spread_filter {
            stats.undefined_suc_quality += 1;
            undefined_suc_sum += result.undefined_possibility;
        }
    }

    let window = shifts as f64;
    stats.buy_possibility_mid = buy_sum / window;
    stats.sell_possibility_mid = sell_sum / window;
    stats.undefined_possibility_mid = undefined_sum / window;

    stats.buy_suc_possibility_mid = ratio(buy_suc_sum, stats.buy_suc_quality as f64);
    stats.sell_suc_possibility_mid = ratio(sell_suc_sum, stats.sell_suc_quality as f64);
    stats.undefined_suc_possibility_mid =
        ratio(undefined_suc_sum, stats.undefined_suc_quality as f64);

    let directional = (stats.buy_quality + stats.sell_quality) as f64;
    stats.possibility_quality = ratio(directional, directional + stats.undefined_quality as f64);

    let suc_directional = (stats.buy_suc_quality + stats.sell_suc_quality) as f64;
    stats.possibility_success_quality = ratio(
        suc_directional,
        suc_directional + stats.undefined_suc_quality as f64,
    );

    Some(stats)
}
