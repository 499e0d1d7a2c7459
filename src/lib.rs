// Core modules
pub mod backtest;
pub mod config;
pub mod error;
pub mod indicators;
pub mod models;
pub mod persistence;
pub mod strategy;

// Re-export commonly used types
pub use backtest::{generate_prices, run_strategy, BacktestMetrics, BacktestRunner};
pub use self::config::AppConfig;
pub use models::*;
pub use strategy::Strategy;

// Error handling
pub use error::{Error, Result};
