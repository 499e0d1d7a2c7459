use crate::backtest::{PriceProcessConfig, DEFAULT_COST_BP, TRADING_PERIODS_PER_YEAR};
use crate::error::{Error, Result};
use crate::strategy::StrategyConfig;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment prefix, e.g. `VPATE_BACKTEST__COST_BP=2.5`
pub const ENV_PREFIX: &str = "VPATE";

/// Synthetic price generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub length: usize,
    pub seed: u64,
    pub process: PriceProcessConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            length: 4000,
            seed: 7,
            process: PriceProcessConfig::default(),
        }
    }
}

/// Accounting settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    pub cost_bp: f64,
    pub periods_per_year: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            cost_bp: DEFAULT_COST_BP,
            periods_per_year: TRADING_PERIODS_PER_YEAR,
        }
    }
}

/// Where CSV output lands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub prices_file: String,
    pub equity_file: String,
    pub table_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            prices_file: "sim_prices.csv".to_string(),
            equity_file: "equity_curve.csv".to_string(),
            table_file: "results.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub simulation: SimulationConfig,
    pub strategy: StrategyConfig,
    pub backtest: BacktestConfig,
    pub output: OutputConfig,
}

impl AppConfig {
    /// Load defaults, then an optional config file, then `VPATE_*` env vars
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.simulation.length == 0 {
            return Err(Error::invalid("simulation.length must be positive"));
        }
        self.simulation.process.validate()?;
        self.strategy.validate()?;

        if !self.backtest.cost_bp.is_finite() || self.backtest.cost_bp < 0.0 {
            return Err(Error::invalid("backtest.cost_bp must be finite and non-negative"));
        }
        if !self.backtest.periods_per_year.is_finite() || self.backtest.periods_per_year <= 0.0 {
            return Err(Error::invalid("backtest.periods_per_year must be positive"));
        }
        Ok(())
    }

    pub fn prices_path(&self) -> PathBuf {
        self.output.dir.join(&self.output.prices_file)
    }

    pub fn equity_path(&self) -> PathBuf {
        self.output.dir.join(&self.output.equity_file)
    }

    pub fn table_path(&self) -> PathBuf {
        self.output.dir.join(&self.output.table_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.simulation.length, 4000);
        assert_eq!(config.simulation.seed, 7);
        assert_eq!(config.backtest.cost_bp, 1.0);
        assert_eq!(config.equity_path(), PathBuf::from("data/equity_curve.csv"));
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[simulation]\nlength = 1500\nseed = 3\n\n[backtest]\ncost_bp = 2.5\n\n[strategy]\nbase_lookback = 60"
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.simulation.length, 1500);
        assert_eq!(config.simulation.seed, 3);
        assert_eq!(config.backtest.cost_bp, 2.5);
        assert_eq!(config.strategy.base_lookback, 60);
        // Untouched sections keep their defaults
        assert_eq!(config.strategy.rank_window, 252);
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[backtest]\ncost_bp = -1.0").unwrap();

        let result = AppConfig::load(Some(file.path()));
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/vpate.toml")));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
