//! Exponential Moving Average (EMA).
//!
//! Recursive: `ema[t] = alpha * price[t] + (1 - alpha) * ema[t-1]` with
//! `alpha = 2 / (period + 1)`. Seeded with the SMA of the first window, so
//! `ema(prices, p)[0] == sma(prices, p)[0]`. Output length is
//! `len - period + 1`, aligned like SMA.

/// EMA of `prices` over `period`.
///
/// Returns an empty vector when `prices.len() < period` or `period == 0`.
pub fn ema(prices: &[f64], period: usize) -> Vec<f64> {
    let n = prices.len();
    if period == 0 || n < period {
        return Vec::new();
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let seed = prices.iter().take(period).sum::<f64>() / period as f64;

    let mut result = Vec::with_capacity(n - period + 1);
    result.push(seed);

    let mut prev = seed;
    for &price in &prices[period..] {
        let value = alpha * price + (1.0 - alpha) * prev;
        result.push(value);
        prev = value;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, sma, DEFAULT_EPSILON};

    #[test]
    fn ema_3_known_values() {
        // alpha = 2/(3+1) = 0.5
        // Seed: SMA(10,11,12) = 11.0
        // ema[1] = 0.5*13 + 0.5*11.0 = 12.0
        // ema[2] = 0.5*14 + 0.5*12.0 = 13.0
        let prices = [10.0, 11.0, 12.0, 13.0, 14.0];
        let result = ema(&prices, 3);
        assert_eq!(result.len(), 3);
        assert_approx(result[0], 11.0, DEFAULT_EPSILON);
        assert_approx(result[1], 12.0, DEFAULT_EPSILON);
        assert_approx(result[2], 13.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_seed_matches_sma() {
        let prices = [3.0, 7.0, 4.0, 9.0, 6.0, 8.0, 5.0];
        for period in 1..=prices.len() {
            let e = ema(&prices, period);
            let s = sma(&prices, period);
            assert_approx(e[0], s[0], DEFAULT_EPSILON);
        }
    }

    #[test]
    fn ema_period_1_equals_input() {
        let prices = [100.0, 200.0, 300.0];
        let result = ema(&prices, 1);
        for (a, b) in result.iter().zip(prices.iter()) {
            assert_approx(*a, *b, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn ema_too_few_prices_is_empty() {
        assert!(ema(&[10.0, 11.0], 5).is_empty());
        assert!(ema(&[], 3).is_empty());
    }

    #[test]
    fn ema_responds_to_step_faster_than_sma() {
        // Flat, then a step up: the EMA weights recent prices more heavily
        // and should sit above the SMA shortly after the jump.
        let mut prices = vec![100.0; 15];
        prices.extend(vec![110.0; 5]);
        let e = ema(&prices, 10);
        let s = sma(&prices, 10);
        assert!(e.last().unwrap() > s.last().unwrap());
    }
}
