//! Trade execution against the simulated two-asset portfolio.
//!
//! Two reachable outcomes per actionable step: a no-op (balance rejection,
//! recorded distinctly from risk blocks) or an executed trade. Balances
//! update atomically and the portfolio is marked to market from balances
//! after every fill, keeping the accounting identity exact.

use crate::domain::{Candle, Portfolio, Signal, SignalAction, Trade, TradeAudit, TradeSide};
use crate::engine::context::{OpenLot, RunContext, StepOutcome};

/// Reason a matched entry was closed, recorded in the entry's audit.
const EXIT_SIGNAL_SELL: &str = "signal_sell";

/// Apply an approved (post-risk-gate) buy or sell at the candle close.
///
/// Buy size: `position_multiplier × max_position_pct × quote_balance ×
/// confidence`. Sell amount: `max_position_pct` of the held asset, not
/// scaled by confidence. Realized P&L on a sell is computed against the most
/// recent unmatched buy.
pub fn apply_signal(
    portfolio: &mut Portfolio,
    ctx: &mut RunContext,
    signal: &Signal,
    audit: TradeAudit,
    candle: &Candle,
    index: usize,
    max_position_pct: f64,
    closes: &[f64],
) -> StepOutcome {
    match signal.action {
        SignalAction::Buy => execute_buy(portfolio, ctx, signal, audit, candle, index, max_position_pct),
        SignalAction::Sell => {
            execute_sell(portfolio, ctx, signal, audit, candle, index, max_position_pct, closes)
        }
        SignalAction::Hold => StepOutcome::Held,
    }
}

fn execute_buy(
    portfolio: &mut Portfolio,
    ctx: &mut RunContext,
    signal: &Signal,
    audit: TradeAudit,
    candle: &Candle,
    index: usize,
    max_position_pct: f64,
) -> StepOutcome {
    let price = candle.close;
    let size =
        signal.position_multiplier * max_position_pct * portfolio.quote_balance * signal.confidence;
    if size <= 0.0 || size > portfolio.quote_balance {
        return StepOutcome::RejectedInsufficientQuote;
    }

    let asset_amount = size / price;
    portfolio.quote_balance -= size;
    portfolio.asset_balance += asset_amount;
    portfolio.trade_count += 1;
    portfolio.mark_to_market(price);

    let id = ctx.next_trade_id();
    ctx.trades.push(Trade {
        id,
        side: TradeSide::Buy,
        timestamp: candle.timestamp,
        price,
        asset_amount,
        quote_amount: size,
        signal_value: signal.value,
        confidence: signal.confidence,
        portfolio_value: portfolio.total_value,
        realized_pnl: None,
        audit: Some(audit),
    });
    ctx.open_lots.push(OpenLot {
        trade_index: ctx.trades.len() - 1,
        candle_index: index,
        price,
        amount: asset_amount,
    });
    StepOutcome::Filled(id)
}

#[allow(clippy::too_many_arguments)]
fn execute_sell(
    portfolio: &mut Portfolio,
    ctx: &mut RunContext,
    signal: &Signal,
    audit: TradeAudit,
    candle: &Candle,
    index: usize,
    max_position_pct: f64,
    closes: &[f64],
) -> StepOutcome {
    if portfolio.asset_balance <= 0.0 {
        return StepOutcome::RejectedNoAsset;
    }

    let price = candle.close;
    let amount = max_position_pct * portfolio.asset_balance;
    let proceeds = amount * price;
    portfolio.asset_balance -= amount;
    portfolio.quote_balance += proceeds;
    portfolio.trade_count += 1;
    portfolio.mark_to_market(price);

    // Close against the most recent unmatched buy. This is a deliberate
    // single-lot heuristic, not full lot accounting.
    let realized_pnl = ctx.open_lots.pop().map(|lot| {
        let pnl = (price - lot.price) * amount;
        close_entry_audit(ctx, &lot, closes, index, price);
        pnl
    });
    if realized_pnl.is_some_and(|pnl| pnl > 0.0) {
        portfolio.winning_trades += 1;
    }

    let id = ctx.next_trade_id();
    ctx.trades.push(Trade {
        id,
        side: TradeSide::Sell,
        timestamp: candle.timestamp,
        price,
        asset_amount: amount,
        quote_amount: proceeds,
        signal_value: signal.value,
        confidence: signal.confidence,
        portfolio_value: portfolio.total_value,
        realized_pnl,
        audit: Some(audit),
    });
    StepOutcome::Filled(id)
}

/// Fill in the retrospective half of the matched entry's audit.
fn close_entry_audit(ctx: &mut RunContext, lot: &OpenLot, closes: &[f64], index: usize, exit_price: f64) {
    let Some(entry_audit) = ctx
        .trades
        .get_mut(lot.trade_index)
        .and_then(|t| t.audit.as_mut())
    else {
        return;
    };

    let window = &closes[lot.candle_index..=index.min(closes.len() - 1)];
    let mut best = 0.0f64;
    let mut worst = 0.0f64;
    for close in window {
        let excursion = (close - lot.price) / lot.price;
        best = best.max(excursion);
        worst = worst.min(excursion);
    }

    entry_audit.holding_bars = Some(index - lot.candle_index);
    entry_audit.max_favorable_excursion = Some(best);
    entry_audit.max_adverse_excursion = Some(worst);
    entry_audit.exit_reason = Some(EXIT_SIGNAL_SELL.to_string());
    entry_audit.realized_roi = Some((exit_price - lot.price) / lot.price);
}
