//! Adaptive period selection
//!
//! Re-evaluates candidate sampling periods against the current history
//! snapshot once per bar and keeps the one with the best historical
//! success quality.

use tracing::trace;

use crate::config::EngineConfig;
use crate::possibility::aggregate;
use crate::{BarHistory, EngineState, PeriodStatistics};

/// Pick the best candidate period and install it into `state`
///
/// Fixed mode evaluates exactly `initial_period`; adaptive mode sweeps
/// every period `1..=max_period` and keeps the strictly greatest
/// `possibility_success_quality` (ties favor the first candidate found).
/// Returns `None` when no candidate has enough history, in which case
/// `state` is left untouched and the bar yields no decision.
pub fn select(
    history: &BarHistory,
    config: &EngineConfig,
    state: &mut EngineState,
) -> Option<PeriodStatistics> {
    let best = if config.auto_select_period {
        let mut best: Option<PeriodStatistics> = None;
        for period in 1..=config.max_period {
            let Some(stats) =
                aggregate(history, period, config.history_multiplier, config.spread_filter)
            else {
                continue;
            };
            trace!(
                period,
                success_quality = stats.possibility_success_quality,
                "evaluated candidate period"
            );
            let better = match &best {
                Some(current) => {
                    stats.possibility_success_quality > current.possibility_success_quality
                }
                None => true,
            };
            if better {
                best = Some(stats);
            }
        }
        best
    } else {
        aggregate(
            history,
            config.initial_period,
            config.history_multiplier,
            config.spread_filter,
        )
    }?;

    state.previous_period = state.current_period;
    state.current_period = best.period;
    state.current_window_size = best.window;
    state.active = Some(best.clone());

    Some(best)
}
