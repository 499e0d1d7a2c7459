use crate::models::ResultTable;
use serde::{Deserialize, Serialize};

/// Periods per year used to annualize daily-bar statistics
pub const TRADING_PERIODS_PER_YEAR: f64 = 252.0;

/// Summary statistics of a backtest result table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestMetrics {
    // Growth
    pub bars: usize,
    pub final_equity: f64,
    pub total_return_pct: f64,
    pub cagr_proxy: f64,

    // Risk
    pub max_drawdown_pct: f64,
    pub sharpe_ratio: f64,

    // Activity
    pub position_changes: usize, // Flips of the executed position
    pub exposure_pct: f64,       // Share of bars holding a filled long

    // Transaction Costs
    pub total_cost_pct: f64, // Sum of per-bar cost deductions, in percent
}

impl BacktestMetrics {
    /// Calculate metrics from a result table
    pub fn from_table(table: &ResultTable, periods_per_year: f64) -> Self {
        let equity = table.equity();
        let net = table.net();
        let returns = table.ret();
        let executed = table.executed();

        let final_equity = table.last_equity();
        let position_changes = executed
            .windows(2)
            .filter(|pair| pair[0] != pair[1])
            .count();
        let exposure_pct = if executed.is_empty() {
            0.0
        } else {
            executed.iter().sum::<f64>() / executed.len() as f64 * 100.0
        };

        // Cost is whatever the held position earned but the bar did not keep
        let total_cost: f64 = executed
            .iter()
            .zip(&returns)
            .zip(&net)
            .map(|((pos, ret), net)| pos * ret - net)
            .sum();

        Self {
            bars: table.len(),
            final_equity,
            total_return_pct: (final_equity - 1.0) * 100.0,
            cagr_proxy: table.cagr_proxy(periods_per_year),
            max_drawdown_pct: Self::calculate_max_drawdown_pct(&equity),
            sharpe_ratio: Self::calculate_sharpe_ratio(&net, periods_per_year),
            position_changes,
            exposure_pct,
            total_cost_pct: total_cost * 100.0,
        }
    }

    /// Largest peak-to-trough decline of the equity curve, in percent
    ///
    /// The curve starts from the implicit 1.0 before the first bar.
    fn calculate_max_drawdown_pct(equity: &[f64]) -> f64 {
        let mut peak = 1.0_f64;
        let mut max_dd = 0.0_f64;

        for &value in equity {
            peak = peak.max(value);
            if peak > 0.0 {
                max_dd = max_dd.max((peak - value) / peak);
            }
        }

        max_dd * 100.0
    }

    /// Annualized Sharpe ratio of per-bar net returns
    /// Assumes risk-free rate of 0
    fn calculate_sharpe_ratio(returns: &[f64], periods_per_year: f64) -> f64 {
        if returns.len() < 2 {
            return 0.0;
        }

        let mean_return = returns.iter().sum::<f64>() / returns.len() as f64;
        let variance = returns
            .iter()
            .map(|r| {
                let diff = r - mean_return;
                diff * diff
            })
            .sum::<f64>()
            / (returns.len() - 1) as f64;

        let std_dev = variance.sqrt();

        if std_dev > 0.0 {
            mean_return / std_dev * periods_per_year.sqrt()
        } else {
            0.0
        }
    }

    /// Print a formatted report to stdout
    pub fn print_report(&self) {
        println!("\n╔═══════════════════════════════════════════════════════╗");
        println!("║              BACKTEST PERFORMANCE REPORT              ║");
        println!("╚═══════════════════════════════════════════════════════╝\n");

        println!("📊 GROWTH");
        println!("  Bars:                  {}", self.bars);
        println!("  Final Equity:          {:.4}", self.final_equity);
        println!("  Total Return:          {:+.2}%", self.total_return_pct);
        println!("  CAGR Proxy:            {:+.4}", self.cagr_proxy);

        println!("\n⚠️  RISK METRICS");
        println!("  Max Drawdown:          {:.2}%", self.max_drawdown_pct);
        println!("  Sharpe Ratio:          {:.2}", self.sharpe_ratio);

        println!("\n📈 ACTIVITY");
        println!("  Position Changes:      {}", self.position_changes);
        println!("  Time in Market:        {:.1}%", self.exposure_pct);

        println!("\n💸 TRANSACTION COSTS");
        println!("  Total Cost:            {:.4}%", self.total_cost_pct);

        println!("\n═══════════════════════════════════════════════════════\n");
    }
}
