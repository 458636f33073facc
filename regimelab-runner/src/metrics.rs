//! Performance metrics — pure functions that compute per-window statistics.
//!
//! Every metric is a pure function: equity curve, close series, and/or trade
//! list in, scalar out. No dependencies on the runner or engine internals.

use regimelab_core::domain::{Trade, TradeSide};
use serde::{Deserialize, Serialize};

/// Periods per year for annualization (hourly series, crypto-style 24/7).
const PERIODS_PER_YEAR: f64 = 365.0 * 24.0;

/// Aggregate performance metrics for one (config, window) run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodMetrics {
    /// Absolute return in quote currency.
    pub return_abs: f64,
    /// Return as a percentage of initial capital.
    pub return_pct: f64,
    /// Strategy return minus buy-and-hold return, in percentage points.
    pub vs_buy_hold_pct: f64,
    pub trade_count: usize,
    /// Winning sells over closed sells.
    pub win_rate: f64,
    /// Maximum drawdown as a negative percentage (e.g. -15.0).
    pub max_drawdown_pct: f64,
    /// Annualized Sharpe ratio; zero when variance is zero.
    pub sharpe: f64,
}

impl PeriodMetrics {
    /// The all-zero result, returned for windows below the minimum size.
    pub fn zero() -> Self {
        Self {
            return_abs: 0.0,
            return_pct: 0.0,
            vs_buy_hold_pct: 0.0,
            trade_count: 0,
            win_rate: 0.0,
            max_drawdown_pct: 0.0,
            sharpe: 0.0,
        }
    }

    /// Compute all metrics from a completed run.
    ///
    /// `closes` is the evaluated slice of the window (the same candles the
    /// equity curve covers), used for the buy-and-hold benchmark.
    pub fn compute(
        equity_curve: &[f64],
        closes: &[f64],
        trades: &[Trade],
        initial_capital: f64,
    ) -> Self {
        let return_pct = period_return_pct(equity_curve, initial_capital);
        Self {
            return_abs: period_return_abs(equity_curve, initial_capital),
            return_pct,
            vs_buy_hold_pct: return_pct - buy_hold_return_pct(closes),
            trade_count: trades.len(),
            win_rate: win_rate(trades),
            max_drawdown_pct: max_drawdown_pct(equity_curve),
            sharpe: sharpe_ratio(equity_curve),
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Absolute return: final equity minus initial capital.
pub fn period_return_abs(equity_curve: &[f64], initial_capital: f64) -> f64 {
    match equity_curve.last() {
        Some(last) => last - initial_capital,
        None => 0.0,
    }
}

/// Return as a percentage of initial capital.
pub fn period_return_pct(equity_curve: &[f64], initial_capital: f64) -> f64 {
    if initial_capital <= 0.0 {
        return 0.0;
    }
    period_return_abs(equity_curve, initial_capital) / initial_capital * 100.0
}

/// Buy-and-hold benchmark return over the same closes, in percent.
pub fn buy_hold_return_pct(closes: &[f64]) -> f64 {
    match (closes.first(), closes.last()) {
        (Some(&first), Some(&last)) if first > 0.0 => (last - first) / first * 100.0,
        _ => 0.0,
    }
}

/// Win rate over closed sells: winners / closed. Zero when nothing closed.
pub fn win_rate(trades: &[Trade]) -> f64 {
    let closed: Vec<&Trade> = trades
        .iter()
        .filter(|t| t.side == TradeSide::Sell && t.realized_pnl.is_some())
        .collect();
    if closed.is_empty() {
        return 0.0;
    }
    let winners = closed.iter().filter(|t| t.is_winner()).count();
    winners as f64 / closed.len() as f64
}

/// Maximum drawdown as a negative percentage (0.0 for monotone equity).
pub fn max_drawdown_pct(equity_curve: &[f64]) -> f64 {
    if equity_curve.len() < 2 {
        return 0.0;
    }
    let mut peak = equity_curve[0];
    let mut max_dd = 0.0_f64;
    for &eq in equity_curve {
        if eq > peak {
            peak = eq;
        }
        if peak > 0.0 {
            let dd = (eq - peak) / peak;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd * 100.0
}

/// Annualized Sharpe ratio from per-bar equity returns.
///
/// Returns 0.0 for fewer than 2 returns or zero variance.
pub fn sharpe_ratio(equity_curve: &[f64]) -> f64 {
    let returns = bar_returns(equity_curve);
    if returns.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(&returns);
    let std = std_dev(&returns);
    if std < 1e-15 {
        return 0.0;
    }
    (mean / std) * PERIODS_PER_YEAR.sqrt()
}

// ─── Helpers ────────────────────────────────────────────────────────

/// Per-bar simple returns of an equity curve.
pub fn bar_returns(equity_curve: &[f64]) -> Vec<f64> {
    if equity_curve.len() < 2 {
        return Vec::new();
    }
    equity_curve
        .windows(2)
        .map(|w| if w[0] > 0.0 { (w[1] - w[0]) / w[0] } else { 0.0 })
        .collect()
}

pub(crate) fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
