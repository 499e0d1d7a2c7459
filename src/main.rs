use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vpate::backtest::{BacktestMetrics, BacktestRunner, SyntheticDataGenerator};
use vpate::persistence::{write_equity_csv, write_prices_csv, write_table_csv};
use vpate::strategy::{Strategy, VolatilityBreakoutStrategy};
use vpate::AppConfig;

/// Simulate a price path and backtest the volatility-adaptive breakout
#[derive(Debug, Parser)]
#[command(name = "vpate", version, about)]
struct Cli {
    /// TOML config file (env vars prefixed VPATE_ override it)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of synthetic bars
    #[arg(long)]
    length: Option<usize>,

    /// RNG seed for the price path
    #[arg(long)]
    seed: Option<u64>,

    /// Transaction cost per position flip, in basis points
    #[arg(long)]
    cost_bp: Option<f64>,

    /// Directory for CSV output
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Also write every column of the result table
    #[arg(long)]
    full_table: bool,

    /// Print metrics as JSON instead of the report
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(length) = self.length {
            config.simulation.length = length;
        }
        if let Some(seed) = self.seed {
            config.simulation.seed = seed;
        }
        if let Some(cost_bp) = self.cost_bp {
            config.backtest.cost_bp = cost_bp;
        }
        if let Some(dir) = &self.output_dir {
            config.output.dir = dir.clone();
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    let cli = Cli::parse();

    let mut config =
        AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    tracing::info!(
        "Simulating {} bars (seed {})",
        config.simulation.length,
        config.simulation.seed
    );
    let close = SyntheticDataGenerator::new(config.simulation.seed)
        .with_process(config.simulation.process.clone())
        .generate(config.simulation.length)
        .context("Failed to generate prices")?;

    let strategy = VolatilityBreakoutStrategy::new(config.strategy.clone())?;
    tracing::info!("Running {} at {} bp", strategy.name(), config.backtest.cost_bp);
    let runner = BacktestRunner::new(strategy, config.backtest.cost_bp)?;
    let table = runner.run(&close).context("Backtest failed")?;

    let prices_path = config.prices_path();
    write_prices_csv(&prices_path, &table)
        .with_context(|| format!("Failed to write {}", prices_path.display()))?;
    let equity_path = config.equity_path();
    write_equity_csv(&equity_path, &table)
        .with_context(|| format!("Failed to write {}", equity_path.display()))?;
    if cli.full_table {
        let table_path = config.table_path();
        write_table_csv(&table_path, &table)
            .with_context(|| format!("Failed to write {}", table_path.display()))?;
    }
    tracing::info!("Wrote CSV output to {}", config.output.dir.display());

    let metrics = BacktestMetrics::from_table(&table, config.backtest.periods_per_year);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    } else {
        metrics.print_report();
    }

    println!(
        "CAGR proxy: {}",
        table.cagr_proxy(config.backtest.periods_per_year)
    );

    Ok(())
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vpate=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
