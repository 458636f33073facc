//! Circuit breaker — halts new entries after a losing streak.

use crate::domain::{SignalAction, Trade, TradeSide};
use crate::risk::{RiskContext, RiskFilter, RiskVerdict};

/// Blocks new buys when the realized win rate over the last `lookback`
/// closed trades falls below `min_win_rate`.
///
/// Sells always pass (positions may still be unwound), and the gate stays
/// open until at least `lookback` closed trades exist.
#[derive(Debug, Clone)]
pub struct CircuitBreaker {
    lookback: usize,
    min_win_rate: f64,
}

impl CircuitBreaker {
    pub fn new(lookback: usize, min_win_rate: f64) -> Self {
        Self {
            lookback,
            min_win_rate,
        }
    }

    /// Realized win rate over the last `lookback` closed trades, if enough exist.
    fn recent_win_rate(&self, trades: &[Trade]) -> Option<f64> {
        let closed: Vec<&Trade> = trades
            .iter()
            .filter(|t| t.side == TradeSide::Sell && t.realized_pnl.is_some())
            .collect();
        if closed.len() < self.lookback {
            return None;
        }
        let recent = &closed[closed.len() - self.lookback..];
        let wins = recent.iter().filter(|t| t.is_winner()).count();
        Some(wins as f64 / self.lookback as f64)
    }
}

impl RiskFilter for CircuitBreaker {
    fn name(&self) -> &'static str {
        "circuit_breaker"
    }

    fn evaluate(&self, ctx: &RiskContext<'_>) -> RiskVerdict {
        if ctx.action != SignalAction::Buy {
            return RiskVerdict::Passed;
        }
        match self.recent_win_rate(ctx.trades) {
            Some(win_rate) if win_rate < self.min_win_rate => RiskVerdict::Blocked,
            _ => RiskVerdict::Passed,
        }
    }
}
