//! RegimeLab Runner — backtest orchestration over the core engine.
//!
//! This crate builds on `regimelab-core` to provide:
//! - Per-window performance metrics (pure functions)
//! - Named backtest windows, historical and deterministic-synthetic
//! - Single-backtest runner with zero-metrics handling for short windows
//! - Config catalog (built-in presets + TOML loading)
//! - Rayon-parallel optimization sweep with weighted scoring and ranking
//! - JSON/CSV artifact export

pub mod catalog;
pub mod export;
pub mod metrics;
pub mod optimizer;
pub mod runner;
pub mod windows;

pub use catalog::{builtin_catalog, load_catalog, CatalogError, NamedConfig};
pub use export::{export_equity_csv, export_json, export_leaderboard_csv, export_trades_csv, save_artifacts};
pub use metrics::PeriodMetrics;
pub use optimizer::{optimize, OptimizationReport, RankedConfig, ScoreWeights};
pub use runner::{run_backtest, BacktestError, BacktestResult};
pub use windows::{historical_window, synthetic_suite, BacktestWindow, WindowRole};

/// Install a stderr tracing subscriber honoring `RUST_LOG`.
///
/// Call once from a binary or test harness; repeated calls are ignored.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}
