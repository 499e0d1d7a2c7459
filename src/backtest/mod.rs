pub mod metrics;
pub mod runner;
pub mod synthetic;

pub use metrics::{BacktestMetrics, TRADING_PERIODS_PER_YEAR};
pub use runner::{account, run_strategy, BacktestRunner, Ledger, DEFAULT_COST_BP};
pub use synthetic::{generate_prices, PriceProcessConfig, SyntheticDataGenerator};
