//! Technical indicators
//!
//! Indicator feeders for the replay front-end. The engine itself never
//! computes these; it consumes their latest values through
//! `IndicatorSnapshot`.

/// Calculate Simple Moving Average
pub fn sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = Vec::with_capacity(values.len());

    for i in 0..values.len() {
        if period == 0 || i + 1 < period {
            result.push(None);
        } else {
            let sum: f64 = values[i + 1 - period..=i].iter().sum();
            result.push(Some(sum / period as f64));
        }
    }

    result
}

/// Calculate Exponential Moving Average
pub fn ema(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = Vec::with_capacity(values.len());

    if values.is_empty() || period == 0 {
        return result;
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut ema_value: Option<f64> = None;

    for (i, &value) in values.iter().enumerate() {
        if i < period - 1 {
            result.push(None);
        } else if i == period - 1 {
            // Initialize with SMA
            let sum: f64 = values[0..period].iter().sum();
            ema_value = Some(sum / period as f64);
            result.push(ema_value);
        } else if let Some(prev_ema) = ema_value {
            let new_ema = (value - prev_ema) * multiplier + prev_ema;
            ema_value = Some(new_ema);
            result.push(Some(new_ema));
        }
    }

    result
}

/// Calculate Stochastic Oscillator (%K and its %D signal line)
pub fn stochastic(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    period: usize,
    signal_period: usize,
) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let mut k = Vec::with_capacity(close.len());

    for i in 0..close.len() {
        if period == 0 || i + 1 < period {
            k.push(None);
            continue;
        }
        let window = i + 1 - period..=i;
        let highest = high[window.clone()].iter().cloned().fold(f64::MIN, f64::max);
        let lowest = low[window].iter().cloned().fold(f64::MAX, f64::min);
        let range = highest - lowest;
        if range == 0.0 {
            k.push(Some(50.0));
        } else {
            k.push(Some((close[i] - lowest) / range * 100.0));
        }
    }

    // %D smooths the defined stretch of %K
    let k_values: Vec<f64> = k.iter().map(|v| v.unwrap_or(0.0)).collect();
    let mut d = sma(&k_values, signal_period);
    for (i, slot) in d.iter_mut().enumerate() {
        if k[i].is_none() {
            *slot = None;
        }
    }

    (k, d)
}

/// Calculate Commodity Channel Index
pub fn cci(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Vec<Option<f64>> {
    let typical: Vec<f64> = (0..close.len())
        .map(|i| (high[i] + low[i] + close[i]) / 3.0)
        .collect();
    let tp_sma = sma(&typical, period);

    let mut result = Vec::with_capacity(close.len());
    for i in 0..close.len() {
        match tp_sma[i] {
            Some(mean) => {
                let deviation: f64 = typical[i + 1 - period..=i]
                    .iter()
                    .map(|tp| (tp - mean).abs())
                    .sum::<f64>()
                    / period as f64;
                if deviation == 0.0 {
                    result.push(Some(0.0));
                } else {
                    result.push(Some((typical[i] - mean) / (0.015 * deviation)));
                }
            }
            None => result.push(None),
        }
    }

    result
}

/// Calculate Directional Movement Index (DMI) components
pub fn dmi(high: &[f64], low: &[f64], period: usize) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let mut plus_dm = vec![0.0; high.len()];
    let mut minus_dm = vec![0.0; high.len()];

    for i in 1..high.len() {
        let up_move = high[i] - high[i - 1];
        let down_move = low[i - 1] - low[i];

        if up_move > down_move && up_move > 0.0 {
            plus_dm[i] = up_move;
        }
        if down_move > up_move && down_move > 0.0 {
            minus_dm[i] = down_move;
        }
    }

    let plus_di = ema(&plus_dm, period);
    let minus_di = ema(&minus_dm, period);

    (plus_di, minus_di)
}
