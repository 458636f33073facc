//! RegimeLab Core — regime-aware adaptive strategy engine.
//!
//! This crate contains the heart of the backtester:
//! - Domain types (candles, portfolio, signals, trades, audit records)
//! - Indicator library (SMA, EMA, MACD, RSI, Bollinger bands)
//! - Regime detection with hysteresis (trend score, persistence commit)
//! - Adaptive signal generation (regime-selected sub-config, weighted fusion,
//!   momentum confirmation, position sizing)
//! - Risk filter chain (volatility, whipsaw, circuit breaker, persistence)
//! - The bar-by-bar simulation loop

pub mod config;
pub mod domain;
pub mod engine;
pub mod indicators;
pub mod regime;
pub mod risk;
pub mod signal;
