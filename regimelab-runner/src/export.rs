//! Report and export — JSON and CSV artifact generation.
//!
//! Three artifact formats:
//! - **JSON**: the full `OptimizationReport`, round-trippable for tooling
//! - **Leaderboard CSV**: one row per (config, window) with rank and score
//! - **Equity CSV**: bar-by-bar equity curve for external analysis tools

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regimelab_core::domain::Trade;

use crate::optimizer::OptimizationReport;

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize the full optimization report to pretty JSON.
pub fn export_json(report: &OptimizationReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize OptimizationReport to JSON")
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export the ranked leaderboard as CSV, one row per (config, window).
///
/// Columns: rank, config_name, config_id, score, window, role, return_pct,
/// vs_buy_hold_pct, trades, win_rate, max_drawdown_pct, sharpe
pub fn export_leaderboard_csv(report: &OptimizationReport) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "rank",
        "config_name",
        "config_id",
        "score",
        "window",
        "role",
        "return_pct",
        "vs_buy_hold_pct",
        "trades",
        "win_rate",
        "max_drawdown_pct",
        "sharpe",
    ])?;

    for entry in &report.ranked {
        for window in &entry.windows {
            let m = &window.metrics;
            wtr.write_record([
                &entry.rank.to_string(),
                &entry.config_name,
                &entry.config_id,
                &format!("{:.4}", entry.score),
                &window.window_name,
                &format!("{:?}", window.window_role),
                &format!("{:.4}", m.return_pct),
                &format!("{:.4}", m.vs_buy_hold_pct),
                &m.trade_count.to_string(),
                &format!("{:.4}", m.win_rate),
                &format!("{:.4}", m.max_drawdown_pct),
                &format!("{:.4}", m.sharpe),
            ])?;
        }
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export a trade log as CSV.
pub fn export_trades_csv(trades: &[Trade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "id",
        "side",
        "timestamp",
        "price",
        "asset_amount",
        "quote_amount",
        "signal_value",
        "confidence",
        "portfolio_value",
        "realized_pnl",
        "active_config",
        "exit_reason",
    ])?;

    for t in trades {
        wtr.write_record([
            &t.id.to_string(),
            &format!("{:?}", t.side),
            &t.timestamp.to_rfc3339(),
            &format!("{:.6}", t.price),
            &format!("{:.6}", t.asset_amount),
            &format!("{:.2}", t.quote_amount),
            &format!("{:.4}", t.signal_value),
            &format!("{:.4}", t.confidence),
            &format!("{:.2}", t.portfolio_value),
            &t.realized_pnl.map(|p| format!("{p:.2}")).unwrap_or_default(),
            &t.audit
                .as_ref()
                .map(|a| a.active_config.clone())
                .unwrap_or_default(),
            &t.audit
                .as_ref()
                .and_then(|a| a.exit_reason.clone())
                .unwrap_or_default(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export an equity curve as CSV with bar_index and equity columns.
pub fn export_equity_csv(equity_curve: &[f64]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["bar_index", "equity"])?;
    for (i, eq) in equity_curve.iter().enumerate() {
        wtr.write_record([&i.to_string(), &format!("{eq:.2}")])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for one optimization run under `output_dir`:
///
/// - `report.json` — the full `OptimizationReport`
/// - `leaderboard.csv` — ranked per-window rows
/// - `best_{window}_equity.csv` / `best_{window}_trades.csv` — detail for
///   the winning config on every window
///
/// Returns the created directory.
pub fn save_artifacts(report: &OptimizationReport, output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create artifact dir: {}", output_dir.display()))?;

    std::fs::write(output_dir.join("report.json"), export_json(report)?)?;
    std::fs::write(
        output_dir.join("leaderboard.csv"),
        export_leaderboard_csv(report)?,
    )?;

    if let Some(best) = report.best() {
        for window in &best.windows {
            let stem = format!("best_{}", window.window_name);
            std::fs::write(
                output_dir.join(format!("{stem}_equity.csv")),
                export_equity_csv(&window.equity_curve)?,
            )?;
            std::fs::write(
                output_dir.join(format!("{stem}_trades.csv")),
                export_trades_csv(&window.trades)?,
            )?;
        }
    }

    Ok(output_dir.to_path_buf())
}
