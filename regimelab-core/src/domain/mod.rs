//! Domain types for RegimeLab.

pub mod candle;
pub mod portfolio;
pub mod signal;
pub mod trade;

pub use candle::{validate_series, Candle, CandleError};
pub use portfolio::Portfolio;
pub use signal::{Signal, SignalAction};
pub use trade::{Trade, TradeAudit, TradeSide};

/// Trade identifier, unique within a single run.
pub type TradeId = u64;
