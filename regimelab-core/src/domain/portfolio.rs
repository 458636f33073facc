//! Portfolio — two-asset paper-trading state (quote currency + traded asset).

use serde::{Deserialize, Serialize};

/// Simulated two-asset portfolio.
///
/// The accounting identity must hold after every step:
/// `total_value == quote_balance + asset_balance * current_price`.
/// `mark_to_market()` enforces this by recomputing the total from balances
/// rather than carrying a stale value forward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    /// Base/quote currency available for buys.
    pub quote_balance: f64,
    /// Units of the traded asset currently held.
    pub asset_balance: f64,
    /// Mark-to-market value at the most recent price.
    pub total_value: f64,
    pub initial_capital: f64,
    /// Cumulative return in percent, relative to initial capital.
    pub total_return_pct: f64,
    pub trade_count: usize,
    /// Sells closed with positive realized P&L.
    pub winning_trades: usize,
}

impl Portfolio {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            quote_balance: initial_capital,
            asset_balance: 0.0,
            total_value: initial_capital,
            initial_capital,
            total_return_pct: 0.0,
            trade_count: 0,
            winning_trades: 0,
        }
    }

    /// Recompute total value and cumulative return from current balances.
    pub fn mark_to_market(&mut self, price: f64) {
        self.total_value = self.quote_balance + self.asset_balance * price;
        if self.initial_capital > 0.0 {
            self.total_return_pct =
                (self.total_value - self.initial_capital) / self.initial_capital * 100.0;
        }
    }

    /// Whether the accounting identity holds at the given price.
    pub fn identity_holds(&self, price: f64) -> bool {
        self.total_value == self.quote_balance + self.asset_balance * price
    }
}
