//! Trend-convergence oscillator (MACD family).
//!
//! `macd = ema(fast) - ema(slow)`, a signal line (EMA of the macd line) and a
//! histogram (macd minus signal). Three warm-up lengths apply:
//! - `macd[j]` is aligned with input index `j + slow - 1`
//! - `signal[j]` and `histogram[j]` with input index `j + slow + signal_period - 2`

use crate::indicators::ema;

/// MACD line, signal line, and histogram.
///
/// The three vectors have different lengths; see the module docs for
/// alignment. Use [`crate::indicators::aligned_value`] to read them back at a
/// candle index.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdOutput {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// Compute the MACD family for `prices`.
///
/// Empty outputs when the series is shorter than the slow period, or when
/// the parameters are degenerate (`fast >= slow`, any zero period).
pub fn macd(prices: &[f64], fast: usize, slow: usize, signal_period: usize) -> MacdOutput {
    let empty = MacdOutput {
        macd: Vec::new(),
        signal: Vec::new(),
        histogram: Vec::new(),
    };
    if fast == 0 || signal_period == 0 || fast >= slow || prices.len() < slow {
        return empty;
    }

    let ema_fast = ema(prices, fast);
    let ema_slow = ema(prices, slow);

    // Fast EMA starts earlier; skip its extra head so both align at slow - 1.
    let head = slow - fast;
    let macd_line: Vec<f64> = ema_slow
        .iter()
        .enumerate()
        .map(|(j, s)| ema_fast[j + head] - s)
        .collect();

    let signal_line = ema(&macd_line, signal_period);
    let histogram: Vec<f64> = signal_line
        .iter()
        .enumerate()
        .map(|(j, s)| macd_line[j + signal_period - 1] - s)
        .collect();

    MacdOutput {
        macd: macd_line,
        signal: signal_line,
        histogram,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn macd_lengths() {
        let prices: Vec<f64> = (0..50).map(|i| 100.0 + (i as f64).sin()).collect();
        let out = macd(&prices, 12, 26, 9);
        assert_eq!(out.macd.len(), 50 - 26 + 1);
        assert_eq!(out.signal.len(), out.macd.len() - 9 + 1);
        assert_eq!(out.histogram.len(), out.signal.len());
    }

    #[test]
    fn macd_flat_series_is_zero() {
        let prices = [100.0; 60];
        let out = macd(&prices, 12, 26, 9);
        for v in out.macd.iter().chain(&out.signal).chain(&out.histogram) {
            assert_approx(*v, 0.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn macd_positive_in_uptrend() {
        let prices: Vec<f64> = (0..80).map(|i| 100.0 * 1.01f64.powi(i)).collect();
        let out = macd(&prices, 12, 26, 9);
        assert!(*out.macd.last().unwrap() > 0.0);
        assert!(*out.signal.last().unwrap() > 0.0);
    }

    #[test]
    fn macd_negative_in_downtrend() {
        let prices: Vec<f64> = (0..80).map(|i| 100.0 * 0.99f64.powi(i)).collect();
        let out = macd(&prices, 12, 26, 9);
        assert!(*out.macd.last().unwrap() < 0.0);
    }

    #[test]
    fn macd_histogram_is_macd_minus_signal() {
        let prices: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.3).cos() * 5.0).collect();
        let out = macd(&prices, 5, 10, 4);
        for (j, h) in out.histogram.iter().enumerate() {
            assert_approx(*h, out.macd[j + 3] - out.signal[j], DEFAULT_EPSILON);
        }
    }

    #[test]
    fn macd_short_series_is_empty() {
        let prices: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let out = macd(&prices, 12, 26, 9);
        assert!(out.macd.is_empty());
        assert!(out.signal.is_empty());
        assert!(out.histogram.is_empty());
    }

    #[test]
    fn macd_degenerate_params_are_empty() {
        let prices: Vec<f64> = (0..40).map(|i| i as f64).collect();
        assert!(macd(&prices, 26, 12, 9).macd.is_empty());
        assert!(macd(&prices, 0, 26, 9).macd.is_empty());
        assert!(macd(&prices, 12, 26, 0).macd.is_empty());
    }
}
