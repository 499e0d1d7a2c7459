// Trading strategy module
pub mod vpate;

use crate::Result;

pub use vpate::{StrategyConfig, VolatilityBreakoutStrategy};

/// Per-step signal output, index-aligned with the input prices
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalSeries {
    /// 0.0 (flat) or 1.0 (long)
    pub positions: Vec<f64>,
    /// Volatility percentile rank in [0, 1]
    pub vpr: Vec<f64>,
    /// Breakout lookback used at each step
    pub lookbacks: Vec<usize>,
}

impl SignalSeries {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Base trait for position-generating strategies
pub trait Strategy: Send + Sync {
    /// Compute the full position series for a price path
    fn signals(&self, prices: &[f64]) -> Result<SignalSeries>;

    /// Get strategy name
    fn name(&self) -> &str;

    /// Bars needed before the first position can be non-flat
    fn min_samples_required(&self) -> usize;
}
