//! Trend-score computation and regime classification.
//!
//! The score is a smoothed composite: the normalized spread between a fast
//! and a slow EMA (trend direction and steepness) blended with RSI
//! displacement from its 50 midline (momentum). The mapping from score to
//! label/confidence lives in [`classify`] so it stays independently testable
//! and replaceable without touching the hysteresis wrapper.

use crate::indicators::{aligned_value, ema, rsi};
use crate::regime::{Regime, RegimeState};

/// Fast EMA period for the trend spread.
pub const FAST_PERIOD: usize = 12;
/// Slow EMA period for the trend spread.
pub const SLOW_PERIOD: usize = 26;
/// RSI period for the momentum component.
pub const MOMENTUM_PERIOD: usize = 14;

/// Absolute score at which a candidate leaves the neutral band.
pub const REGIME_SCORE_THRESHOLD: f64 = 0.15;

/// Spread steepness scale: a 2% EMA spread saturates near tanh(1.0).
const SPREAD_SCALE: f64 = 50.0;
/// Blend weights for spread vs momentum.
const SPREAD_WEIGHT: f64 = 0.6;
const MOMENTUM_WEIGHT: f64 = 0.4;

/// Per-run regime detector over a fixed close series.
///
/// All series are precomputed at construction; `step()` is pure lookup plus
/// the hysteresis update on the caller-owned [`RegimeState`].
#[derive(Debug, Clone)]
pub struct RegimeDetector {
    series_len: usize,
    ema_fast: Vec<f64>,
    ema_slow: Vec<f64>,
    momentum: Vec<f64>,
    persistence_periods: usize,
}

impl RegimeDetector {
    pub fn from_closes(closes: &[f64], persistence_periods: usize) -> Self {
        Self {
            series_len: closes.len(),
            ema_fast: ema(closes, FAST_PERIOD),
            ema_slow: ema(closes, SLOW_PERIOD),
            momentum: rsi(closes, MOMENTUM_PERIOD),
            persistence_periods,
        }
    }

    /// Candles needed before the score has both components available.
    pub fn warmup(&self) -> usize {
        SLOW_PERIOD.max(MOMENTUM_PERIOD + 1) - 1
    }

    /// Composite trend/momentum score in [-1, 1] at a candle index.
    ///
    /// Components that have not warmed up contribute zero.
    pub fn trend_score(&self, index: usize) -> f64 {
        let spread = match (
            aligned_value(&self.ema_fast, self.series_len, index, 0),
            aligned_value(&self.ema_slow, self.series_len, index, 0),
        ) {
            (Some(fast), Some(slow)) if slow != 0.0 => {
                ((fast - slow) / slow * SPREAD_SCALE).tanh()
            }
            _ => 0.0,
        };

        let momentum = aligned_value(&self.momentum, self.series_len, index, 0)
            .map(|value| (value - 50.0) / 50.0)
            .unwrap_or(0.0);

        (SPREAD_WEIGHT * spread + MOMENTUM_WEIGHT * momentum).clamp(-1.0, 1.0)
    }

    /// Score the candle at `index` and feed it through the hysteresis.
    pub fn step(&self, state: &mut RegimeState, index: usize) {
        let score = self.trend_score(index);
        let (label, confidence) = classify(score);
        state.observe(label, confidence, self.persistence_periods);
    }
}

/// Map a composite score to a regime label and confidence.
///
/// Confidence is the score magnitude clamped to [0, 1]; labels outside the
/// neutral band require `|score| >= REGIME_SCORE_THRESHOLD`.
pub fn classify(score: f64) -> (Regime, f64) {
    let confidence = score.abs().clamp(0.0, 1.0);
    let label = if score >= REGIME_SCORE_THRESHOLD {
        Regime::Bullish
    } else if score <= -REGIME_SCORE_THRESHOLD {
        Regime::Bearish
    } else {
        Regime::Neutral
    };
    (label, confidence)
}
