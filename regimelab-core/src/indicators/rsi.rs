//! Relative Strength Index (RSI).
//!
//! Wilder smoothing of average gains and average losses:
//! `rsi = 100 - 100 / (1 + avg_gain / avg_loss)`, bounded to [0, 100].
//! Output length is `len - period`; the value at output index `j` is aligned
//! with input index `j + period`.
//! Edge cases: avg_loss == 0 → 100; avg_gain == 0 → 0; no movement → 50.

/// RSI of `prices` over `period`.
///
/// Returns an empty vector when `prices.len() < period + 1` or `period == 0`.
pub fn rsi(prices: &[f64], period: usize) -> Vec<f64> {
    let n = prices.len();
    if period == 0 || n < period + 1 {
        return Vec::new();
    }

    // Seed: average gain/loss over the first `period` changes.
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let change = prices[i] - prices[i - 1];
        if change > 0.0 {
            avg_gain += change;
        } else {
            avg_loss -= change;
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;

    let mut result = Vec::with_capacity(n - period);
    result.push(rsi_value(avg_gain, avg_loss));

    // Wilder smoothing for subsequent values.
    let alpha = 1.0 / period as f64;
    for i in (period + 1)..n {
        let change = prices[i] - prices[i - 1];
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);
        avg_gain = alpha * gain + (1.0 - alpha) * avg_gain;
        avg_loss = alpha * loss + (1.0 - alpha) * avg_loss;
        result.push(rsi_value(avg_gain, avg_loss));
    }

    result
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0 // no movement
    } else if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::assert_approx;

    #[test]
    fn rsi_all_gains_is_100() {
        let prices = [100.0, 101.0, 102.0, 103.0, 104.0, 105.0];
        let result = rsi(&prices, 3);
        assert_approx(result[0], 100.0, 1e-6);
        assert_approx(*result.last().unwrap(), 100.0, 1e-6);
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let prices = [105.0, 104.0, 103.0, 102.0, 101.0, 100.0];
        let result = rsi(&prices, 3);
        assert_approx(result[0], 0.0, 1e-6);
    }

    #[test]
    fn rsi_flat_is_50() {
        let prices = [100.0; 8];
        let result = rsi(&prices, 3);
        for v in result {
            assert_approx(v, 50.0, 1e-6);
        }
    }

    #[test]
    fn rsi_always_bounded() {
        let prices = [100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0];
        for v in rsi(&prices, 3) {
            assert!((0.0..=100.0).contains(&v), "RSI out of bounds: {v}");
        }
    }

    #[test]
    fn rsi_rising_ends_above_50_falling_below() {
        let rising: Vec<f64> = (0..30).map(|i| 100.0 + 0.7 * i as f64).collect();
        let falling: Vec<f64> = (0..30).map(|i| 100.0 - 0.7 * i as f64).collect();
        assert!(*rsi(&rising, 14).last().unwrap() > 50.0);
        assert!(*rsi(&falling, 14).last().unwrap() < 50.0);
    }

    #[test]
    fn rsi_output_length_rule() {
        let prices: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        assert_eq!(rsi(&prices, 3).len(), 10 - 3);
        assert!(rsi(&prices[..3], 3).is_empty());
    }
}
