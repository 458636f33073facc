//! Trade and TradeAudit — the append-only execution log for one run.

use crate::domain::TradeId;
use crate::regime::Regime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSide {
    Buy,
    Sell,
}

/// A single executed trade.
///
/// `realized_pnl` is set on sells when a matching earlier buy is closed;
/// the id and timestamp are non-semantic identifiers and are excluded from
/// determinism comparisons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub side: TradeSide,
    pub timestamp: DateTime<Utc>,
    /// Execution price (candle close).
    pub price: f64,
    /// Units of the traded asset.
    pub asset_amount: f64,
    /// Quote currency moved by this trade.
    pub quote_amount: f64,
    /// Fused signal value that originated the trade.
    pub signal_value: f64,
    pub confidence: f64,
    /// Portfolio total value immediately after execution.
    pub portfolio_value: f64,
    pub realized_pnl: Option<f64>,
    pub audit: Option<TradeAudit>,
}

impl Trade {
    pub fn is_winner(&self) -> bool {
        self.realized_pnl.is_some_and(|pnl| pnl > 0.0)
    }
}

/// Decision-time snapshot plus retrospective outcome fields.
///
/// The snapshot half is written when the trade executes; the outcome half
/// (holding period, excursions, exit reason, ROI) is filled in on the entry
/// trade once a later sell closes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeAudit {
    // ── Decision-time snapshot ──
    pub regime: Regime,
    pub regime_confidence: f64,
    pub active_config: String,
    pub momentum_confirmed: bool,
    pub indicator_snapshot: BTreeMap<String, f64>,
    pub filters_passed: Vec<String>,
    pub filters_blocked: Vec<String>,

    // ── Retrospective outcome (entry trades only) ──
    pub holding_bars: Option<usize>,
    /// Best unrealized gain during the holding window, as a fraction of entry.
    pub max_favorable_excursion: Option<f64>,
    /// Worst unrealized loss during the holding window, as a fraction of entry.
    pub max_adverse_excursion: Option<f64>,
    pub exit_reason: Option<String>,
    pub realized_roi: Option<f64>,
}

impl TradeAudit {
    pub fn at_decision(
        regime: Regime,
        regime_confidence: f64,
        active_config: &str,
        momentum_confirmed: bool,
        indicator_snapshot: BTreeMap<String, f64>,
        filters_passed: Vec<String>,
        filters_blocked: Vec<String>,
    ) -> Self {
        Self {
            regime,
            regime_confidence,
            active_config: active_config.to_string(),
            momentum_confirmed,
            indicator_snapshot,
            filters_passed,
            filters_blocked,
            holding_bars: None,
            max_favorable_excursion: None,
            max_adverse_excursion: None,
            exit_reason: None,
            realized_roi: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_trade() -> Trade {
        Trade {
            id: 7,
            side: TradeSide::Sell,
            timestamp: Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap(),
            price: 110.0,
            asset_amount: 2.0,
            quote_amount: 220.0,
            signal_value: -0.6,
            confidence: 0.6,
            portfolio_value: 1050.0,
            realized_pnl: Some(20.0),
            audit: None,
        }
    }

    #[test]
    fn winner_requires_positive_pnl() {
        let mut t = sample_trade();
        assert!(t.is_winner());
        t.realized_pnl = Some(-5.0);
        assert!(!t.is_winner());
        t.realized_pnl = None;
        assert!(!t.is_winner());
    }

    #[test]
    fn audit_snapshot_starts_without_outcome() {
        let audit = TradeAudit::at_decision(
            Regime::Bullish,
            0.8,
            "bull",
            true,
            BTreeMap::new(),
            vec!["volatility".into()],
            vec![],
        );
        assert!(audit.holding_bars.is_none());
        assert!(audit.exit_reason.is_none());
        assert_eq!(audit.filters_passed, vec!["volatility".to_string()]);
    }

    #[test]
    fn trade_serialization_roundtrip() {
        let t = sample_trade();
        let json = serde_json::to_string(&t).unwrap();
        let deser: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(t.id, deser.id);
        assert_eq!(t.realized_pnl, deser.realized_pnl);
    }
}
