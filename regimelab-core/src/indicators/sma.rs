//! Simple Moving Average (SMA).
//!
//! Arithmetic mean over a trailing window. Output length is
//! `len - period + 1`; the value at output index `j` is aligned with input
//! index `j + period - 1`.

/// Rolling mean of `prices` over `period`-wide windows.
///
/// Returns an empty vector when `prices.len() < period` or `period == 0`.
pub fn sma(prices: &[f64], period: usize) -> Vec<f64> {
    let n = prices.len();
    if period == 0 || n < period {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(n - period + 1);
    let mut sum: f64 = prices.iter().take(period).sum();
    result.push(sum / period as f64);

    for i in period..n {
        sum += prices[i] - prices[i - period];
        result.push(sum / period as f64);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn sma_5_basic() {
        let prices = [10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0];
        let result = sma(&prices, 5);
        assert_eq!(result.len(), 3);
        // mean(10..14) = 12, mean(11..15) = 13, mean(12..16) = 14
        assert_approx(result[0], 12.0, DEFAULT_EPSILON);
        assert_approx(result[1], 13.0, DEFAULT_EPSILON);
        assert_approx(result[2], 14.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_1_equals_input() {
        let prices = [100.0, 200.0, 300.0];
        assert_eq!(sma(&prices, 1), prices.to_vec());
    }

    #[test]
    fn sma_output_length_rule() {
        for n in 0..8 {
            let prices: Vec<f64> = (0..n).map(|i| i as f64).collect();
            let out = sma(&prices, 3);
            assert_eq!(out.len(), if n >= 3 { n - 3 + 1 } else { 0 });
        }
    }

    #[test]
    fn sma_too_few_prices_is_empty() {
        assert!(sma(&[10.0, 11.0], 5).is_empty());
        assert!(sma(&[], 1).is_empty());
    }

    #[test]
    fn sma_zero_period_is_empty() {
        assert!(sma(&[1.0, 2.0, 3.0], 0).is_empty());
    }
}
