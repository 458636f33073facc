//! Candle — the fundamental market data unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OHLCV candle for a single symbol on a single timeframe step.
///
/// Candles arrive pre-assembled from an external data collaborator; the
/// engine never fetches or synthesizes them. Gaps between timestamps are
/// tolerated, but ordering must be strictly ascending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Basic OHLC sanity check: high >= low, high bounds open/close, positive prices.
    pub fn is_sane(&self) -> bool {
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
            && self.volume >= 0.0
    }
}

/// Structural problems in a candle series, rejected before any simulation step.
#[derive(Debug, Error)]
pub enum CandleError {
    #[error("timestamps not strictly ascending at index {index}")]
    NonAscending { index: usize },
    #[error("duplicate timestamp at index {index}")]
    Duplicate { index: usize },
    #[error("candle at index {index} fails OHLC sanity check")]
    Insane { index: usize },
}

/// Validate a candle series: strictly ascending timestamps, no duplicates,
/// every candle sane. Gaps are fine; this core does not fill them.
pub fn validate_series(candles: &[Candle]) -> Result<(), CandleError> {
    for (i, candle) in candles.iter().enumerate() {
        if !candle.is_sane() {
            return Err(CandleError::Insane { index: i });
        }
        if i > 0 {
            let prev = candles[i - 1].timestamp;
            if candle.timestamp == prev {
                return Err(CandleError::Duplicate { index: i });
            }
            if candle.timestamp < prev {
                return Err(CandleError::NonAscending { index: i });
            }
        }
    }
    Ok(())
}
