//! Run-scoped mutable state.
//!
//! Everything that evolves during one simulation lives here and is owned by
//! the simulation call. A fresh context is created per run and discarded at
//! run end, so repeated or parallel runs share nothing (no process-wide
//! caches anywhere in the engine).

use crate::domain::{Signal, Trade, TradeId};
use crate::regime::RegimeState;
use serde::{Deserialize, Serialize};

/// Outcome of one evaluated step, kept alongside the signal log so balance
/// rejections stay distinguishable from risk-filter blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    /// No actionable signal this step.
    Held,
    /// An actionable signal was vetoed by the risk chain.
    RiskBlocked,
    /// Buy rejected: computed size exceeded the available quote balance.
    RejectedInsufficientQuote,
    /// Sell rejected: no asset held.
    RejectedNoAsset,
    Filled(TradeId),
}

/// An open buy lot awaiting a matching sell.
#[derive(Debug, Clone)]
pub struct OpenLot {
    /// Index of the entry trade in the trade log.
    pub trade_index: usize,
    /// Candle index at entry, for holding-period and excursion audit.
    pub candle_index: usize,
    pub price: f64,
    pub amount: f64,
}

/// All mutable state for one simulation run.
#[derive(Debug, Default)]
pub struct RunContext {
    pub regime: RegimeState,
    pub signals: Vec<Signal>,
    pub trades: Vec<Trade>,
    pub outcomes: Vec<StepOutcome>,
    pub equity_curve: Vec<f64>,
    /// Most recent unmatched buys, newest last.
    pub open_lots: Vec<OpenLot>,
    next_trade_id: TradeId,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_trade_id(&mut self) -> TradeId {
        let id = self.next_trade_id;
        self.next_trade_id += 1;
        id
    }
}
