//! Indicator library — pure functions over a close-price series.
//!
//! Every indicator maps `&[f64]` to an output strictly shorter than the input
//! by its warm-up length. Insufficient input yields an empty output, never an
//! error. All series are precomputed once per run before the bar loop and read
//! back per candle through `aligned_value`.

pub mod align;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use align::aligned_value;
pub use bollinger::{bollinger, BollingerOutput};
pub use ema::ema;
pub use macd::{macd, MacdOutput};
pub use rsi::rsi;
pub use sma::sma;

/// Realized volatility of a price window: population standard deviation of
/// simple step returns. `None` for windows with fewer than two prices.
pub fn realized_volatility(window: &[f64]) -> Option<f64> {
    if window.len() < 2 {
        return None;
    }
    let returns: Vec<f64> = window
        .windows(2)
        .map(|pair| {
            if pair[0] == 0.0 {
                0.0
            } else {
                pair[1] / pair[0] - 1.0
            }
        })
        .collect();
    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance =
        returns.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>() / returns.len() as f64;
    Some(variance.sqrt())
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
