//! Signal — one trade intent per evaluated candle.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Trade action after fusion, momentum confirmation, and risk gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalAction {
    Buy,
    Hold,
    Sell,
}

/// Fully-annotated signal for a single candle index.
///
/// `contributions` keeps per-indicator directional values for audit;
/// `blocked_by` lists every risk filter that fired, not just the first
/// (order-stable, for audit completeness).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub action: SignalAction,
    /// Fused indicator vote, clipped to [-1, 1].
    pub value: f64,
    /// Name of the active strategy sub-config (bullish or bearish leg).
    pub active_config: String,
    /// Scales the sub-config's max position fraction at execution time.
    pub position_multiplier: f64,
    /// Signal strength in [0, 1], derived from the fused value.
    pub confidence: f64,
    pub momentum_confirmed: bool,
    pub contributions: BTreeMap<String, f64>,
    /// Names of risk filters that blocked the pre-gate action.
    pub blocked_by: Vec<String>,
}
