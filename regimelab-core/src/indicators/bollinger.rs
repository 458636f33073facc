//! Volatility bands (Bollinger-style).
//!
//! Middle band is the SMA; upper/lower are the middle ± `k` trailing
//! population standard deviations. All three vectors share SMA alignment:
//! output index `j` corresponds to input index `j + period - 1`.

use crate::indicators::sma;

/// Upper/middle/lower band triple.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerOutput {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

/// Bollinger bands of `prices` over `period` with multiplier `k`.
///
/// Empty outputs when `prices.len() < period` or `period == 0`.
pub fn bollinger(prices: &[f64], period: usize, k: f64) -> BollingerOutput {
    let middle = sma(prices, period);
    if middle.is_empty() {
        return BollingerOutput {
            upper: Vec::new(),
            middle,
            lower: Vec::new(),
        };
    }

    let mut upper = Vec::with_capacity(middle.len());
    let mut lower = Vec::with_capacity(middle.len());
    for (j, mean) in middle.iter().enumerate() {
        let window = &prices[j..j + period];
        let variance = window
            .iter()
            .map(|p| (p - mean) * (p - mean))
            .sum::<f64>()
            / period as f64;
        let band = k * variance.sqrt();
        upper.push(mean + band);
        lower.push(mean - band);
    }

    BollingerOutput {
        upper,
        middle,
        lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn bands_collapse_on_constant_series() {
        let prices = [100.0; 10];
        let out = bollinger(&prices, 5, 2.0);
        for j in 0..out.middle.len() {
            assert_approx(out.upper[j], 100.0, DEFAULT_EPSILON);
            assert_approx(out.middle[j], 100.0, DEFAULT_EPSILON);
            assert_approx(out.lower[j], 100.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn bands_are_symmetric_around_middle() {
        let prices = [100.0, 102.0, 98.0, 104.0, 96.0, 101.0, 99.0];
        let out = bollinger(&prices, 5, 2.0);
        for j in 0..out.middle.len() {
            assert_approx(
                out.upper[j] - out.middle[j],
                out.middle[j] - out.lower[j],
                DEFAULT_EPSILON,
            );
            assert!(out.upper[j] >= out.lower[j]);
        }
    }

    #[test]
    fn known_band_width() {
        // Window [2, 4, 6]: mean 4, population variance 8/3, std sqrt(8/3)
        let prices = [2.0, 4.0, 6.0];
        let out = bollinger(&prices, 3, 1.0);
        let std = (8.0f64 / 3.0).sqrt();
        assert_approx(out.middle[0], 4.0, DEFAULT_EPSILON);
        assert_approx(out.upper[0], 4.0 + std, DEFAULT_EPSILON);
        assert_approx(out.lower[0], 4.0 - std, DEFAULT_EPSILON);
    }

    #[test]
    fn wider_k_widens_bands() {
        let prices = [100.0, 102.0, 98.0, 104.0, 96.0, 101.0];
        let narrow = bollinger(&prices, 4, 1.0);
        let wide = bollinger(&prices, 4, 3.0);
        for j in 0..narrow.middle.len() {
            assert!(wide.upper[j] >= narrow.upper[j]);
            assert!(wide.lower[j] <= narrow.lower[j]);
        }
    }

    #[test]
    fn short_series_is_empty() {
        let out = bollinger(&[1.0, 2.0], 5, 2.0);
        assert!(out.upper.is_empty());
        assert!(out.middle.is_empty());
        assert!(out.lower.is_empty());
    }
}
