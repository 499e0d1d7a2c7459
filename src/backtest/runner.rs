use crate::error::{Error, Result};
use crate::models::{PriceSeries, ResultRow, ResultTable};
use crate::strategy::{Strategy, VolatilityBreakoutStrategy};

/// Default transaction cost per full flip, in basis points
pub const DEFAULT_COST_BP: f64 = 1.0;

/// Per-step accounting of a position series against prices
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    pub returns: Vec<f64>,
    pub executed: Vec<f64>, // Position lagged by one step
    pub gross: Vec<f64>,
    pub trades: Vec<f64>, // |change in executed position|
    pub costs: Vec<f64>,
    pub net: Vec<f64>,
    pub equity: Vec<f64>,
}

/// Turn a position series into net returns and a compounded equity curve
///
/// A signal at step `i` is executed at step `i + 1`, so the executed
/// position at step 0 is flat. Each flip of the executed position costs
/// `cost_bp / 10_000`. Equity compounds from an implicit 1.0 before step 0.
pub fn account(prices: &[f64], positions: &[f64], cost_bp: f64) -> Result<Ledger> {
    if prices.len() != positions.len() {
        return Err(Error::LengthMismatch {
            prices: prices.len(),
            positions: positions.len(),
        });
    }
    validate_cost(cost_bp)?;

    let n = prices.len();
    let cost_rate = cost_bp / 10_000.0;
    let mut ledger = Ledger {
        returns: Vec::with_capacity(n),
        executed: Vec::with_capacity(n),
        gross: Vec::with_capacity(n),
        trades: Vec::with_capacity(n),
        costs: Vec::with_capacity(n),
        net: Vec::with_capacity(n),
        equity: Vec::with_capacity(n),
    };

    let mut equity = 1.0;
    for i in 0..n {
        let ret = if i == 0 {
            0.0
        } else {
            prices[i] / prices[i - 1] - 1.0
        };
        let executed = if i == 0 { 0.0 } else { positions[i - 1] };
        let trade = match ledger.executed.last() {
            Some(prev) => (executed - prev).abs(),
            None => 0.0,
        };

        let gross = executed * ret;
        let cost = trade * cost_rate;
        let net = gross - cost;
        equity *= 1.0 + net;

        ledger.returns.push(ret);
        ledger.executed.push(executed);
        ledger.gross.push(gross);
        ledger.trades.push(trade);
        ledger.costs.push(cost);
        ledger.net.push(net);
        ledger.equity.push(equity);
    }

    Ok(ledger)
}

fn validate_cost(cost_bp: f64) -> Result<()> {
    if !cost_bp.is_finite() || cost_bp < 0.0 {
        return Err(Error::invalid(format!(
            "cost in basis points must be finite and non-negative, got {}",
            cost_bp
        )));
    }
    Ok(())
}

/// Backtest runner that applies a strategy to a price series
pub struct BacktestRunner<S: Strategy> {
    strategy: S,
    cost_bp: f64,
}

impl<S: Strategy> BacktestRunner<S> {
    /// Create a new backtest runner
    pub fn new(strategy: S, cost_bp: f64) -> Result<Self> {
        validate_cost(cost_bp)?;
        Ok(Self { strategy, cost_bp })
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn cost_bp(&self) -> f64 {
        self.cost_bp
    }

    /// Run the strategy and account for it, one result row per price
    pub fn run(&self, close: &PriceSeries) -> Result<ResultTable> {
        let prices = close.as_slice();

        tracing::debug!(
            "Starting backtest: {} with {} bars, strategy needs {}, cost {} bp",
            self.strategy.name(),
            prices.len(),
            self.strategy.min_samples_required(),
            self.cost_bp
        );

        let signals = self.strategy.signals(prices)?;
        if signals.vpr.len() != prices.len() {
            return Err(Error::invalid(format!(
                "{} returned {} volatility ranks for {} prices",
                self.strategy.name(),
                signals.vpr.len(),
                prices.len()
            )));
        }
        let ledger = account(prices, &signals.positions, self.cost_bp)?;

        let rows = prices
            .iter()
            .enumerate()
            .map(|(i, &close)| ResultRow {
                close,
                pos: signals.positions[i],
                vpr: signals.vpr[i],
                ret: ledger.returns[i],
                net: ledger.net[i],
                equity: ledger.equity[i],
            })
            .collect();

        let flips: f64 = ledger.trades.iter().sum();
        tracing::debug!(
            "Backtest complete: {} flips, final equity {:.4}",
            flips,
            ledger.equity.last().copied().unwrap_or(1.0)
        );

        Ok(ResultTable { rows })
    }
}

/// Backtest the default volatility-adaptive breakout on `close`
pub fn run_strategy(close: &PriceSeries, cost_bp: f64) -> Result<ResultTable> {
    BacktestRunner::new(VolatilityBreakoutStrategy::default(), cost_bp)?.run(close)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backtest::synthetic::generate_prices;
    use crate::strategy::SignalSeries;

    /// Always long, but reports no volatility ranks
    struct MissingRankStrategy;

    impl Strategy for MissingRankStrategy {
        fn signals(&self, prices: &[f64]) -> Result<SignalSeries> {
            Ok(SignalSeries {
                positions: vec![1.0; prices.len()],
                vpr: vec![],
                lookbacks: vec![],
            })
        }

        fn name(&self) -> &str {
            "MissingRankStrategy"
        }

        fn min_samples_required(&self) -> usize {
            1
        }
    }

    #[test]
    fn test_account_lags_positions() {
        let prices = [100.0, 110.0, 121.0];
        let positions = [1.0, 1.0, 0.0];
        let ledger = account(&prices, &positions, 0.0).unwrap();

        assert_eq!(ledger.executed, vec![0.0, 1.0, 1.0]);
        assert_eq!(ledger.net[0], 0.0);
        assert!((ledger.net[1] - 0.10).abs() < 1e-12);
        assert!((ledger.equity[2] - 1.21).abs() < 1e-12);
    }

    #[test]
    fn test_account_charges_flips() {
        let prices = [100.0, 100.0, 100.0, 100.0];
        let positions = [1.0, 0.0, 1.0, 1.0];
        let ledger = account(&prices, &positions, 10.0).unwrap();

        // Executed: [0, 1, 0, 1] -> three flips at 10 bp
        assert_eq!(ledger.trades, vec![0.0, 1.0, 1.0, 1.0]);
        assert!(ledger.costs[1..].iter().all(|c| (*c - 0.001).abs() < 1e-15));
        assert!((ledger.equity[3] - 0.999_f64.powi(3)).abs() < 1e-12);
    }

    #[test]
    fn test_zero_cost_net_equals_gross() {
        let prices = generate_prices(800, 11).unwrap();
        let strategy = VolatilityBreakoutStrategy::default();
        let signals = strategy.signals(prices.as_slice()).unwrap();
        let ledger = account(prices.as_slice(), &signals.positions, 0.0).unwrap();

        assert_eq!(ledger.net, ledger.gross);
    }

    #[test]
    fn test_length_mismatch() {
        let result = account(&[100.0, 101.0, 102.0], &[0.0, 1.0], 1.0);
        assert!(matches!(
            result,
            Err(Error::LengthMismatch {
                prices: 3,
                positions: 2
            })
        ));
    }

    #[test]
    fn test_short_rank_series_is_an_error() {
        let close = PriceSeries::new(vec![100.0, 101.0, 102.0]).unwrap();
        let runner = BacktestRunner::new(MissingRankStrategy, DEFAULT_COST_BP).unwrap();

        let result = runner.run(&close);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("0 volatility ranks for 3 prices"));
    }

    #[test]
    fn test_negative_cost_rejected() {
        assert!(account(&[100.0], &[0.0], -1.0).is_err());
        assert!(run_strategy(&PriceSeries::new(vec![100.0]).unwrap(), -0.5).is_err());
        assert!(run_strategy(&PriceSeries::new(vec![100.0]).unwrap(), f64::NAN).is_err());
    }

    #[test]
    fn test_empty_series() {
        let table = run_strategy(&PriceSeries::new(vec![]).unwrap(), DEFAULT_COST_BP).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_five_bar_scenario() {
        let close = PriceSeries::new(vec![100.0, 101.0, 99.0, 105.0, 95.0]).unwrap();
        let table = run_strategy(&close, DEFAULT_COST_BP).unwrap();

        assert_eq!(table.len(), 5);
        assert_eq!(table.pos(), vec![0.0; 5]);
        assert_eq!(table.vpr(), vec![0.5; 5]);
        assert_eq!(table.net(), vec![0.0; 5]);
        assert_eq!(table.equity(), vec![1.0; 5]);

        let ret = table.ret();
        assert_eq!(ret[0], 0.0);
        assert!((ret[1] - 0.01).abs() < 1e-12);
        assert!((ret[2] - (99.0 / 101.0 - 1.0)).abs() < 1e-12);
        assert!((ret[3] - (105.0 / 99.0 - 1.0)).abs() < 1e-12);
        assert!((ret[4] - (95.0 / 105.0 - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_equity_recurrence() {
        let close = generate_prices(1500, 5).unwrap();
        let table = run_strategy(&close, DEFAULT_COST_BP).unwrap();
        let rows = &table.rows;

        assert_eq!(rows[0].equity, 1.0 + rows[0].net);
        for i in 1..rows.len() {
            assert_eq!(rows[i].equity, rows[i - 1].equity * (1.0 + rows[i].net));
            assert!(rows[i].equity > 0.0);
        }
    }

    #[test]
    fn test_run_is_idempotent() {
        let close = generate_prices(1200, 9).unwrap();
        let a = run_strategy(&close, DEFAULT_COST_BP).unwrap();
        let b = run_strategy(&close, DEFAULT_COST_BP).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_series_value_ranges() {
        let close = generate_prices(2000, 2).unwrap();
        let table = run_strategy(&close, DEFAULT_COST_BP).unwrap();

        for row in &table.rows {
            assert!(row.pos == 0.0 || row.pos == 1.0);
            assert!((0.0..=1.0).contains(&row.vpr));
            assert!(row.net.is_finite());
            assert!(row.equity > 0.0);
        }
    }
}
