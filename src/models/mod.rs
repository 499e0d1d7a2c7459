use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Close prices, one per step, all finite and strictly positive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    values: Vec<f64>,
}

impl PriceSeries {
    /// Validate and wrap raw close prices. An empty series is allowed.
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if let Some((i, p)) = values
            .iter()
            .enumerate()
            .find(|(_, p)| !p.is_finite() || **p <= 0.0)
        {
            return Err(Error::invalid(format!(
                "price at index {} must be finite and positive, got {}",
                i, p
            )));
        }

        Ok(Self { values })
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One step of a backtest
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub close: f64,
    pub pos: f64,  // Signal position (0.0 flat, 1.0 long)
    pub vpr: f64,  // Volatility percentile rank
    pub ret: f64,  // Close-to-close return
    pub net: f64,  // Return after lag and costs
    pub equity: f64,
}

/// Backtest output, one row per input step in input order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    pub rows: Vec<ResultRow>,
}

impl ResultTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn close(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.close).collect()
    }

    pub fn pos(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.pos).collect()
    }

    pub fn vpr(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.vpr).collect()
    }

    /// Position actually held at each step: the signal lagged by one bar,
    /// flat at step 0
    pub fn executed(&self) -> Vec<f64> {
        let mut executed = Vec::with_capacity(self.rows.len());
        let mut prev = 0.0;
        for row in &self.rows {
            executed.push(prev);
            prev = row.pos;
        }
        executed
    }

    pub fn ret(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.ret).collect()
    }

    pub fn net(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.net).collect()
    }

    pub fn equity(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.equity).collect()
    }

    /// Final equity, 1.0 (the implicit starting unit) for an empty table
    pub fn last_equity(&self) -> f64 {
        self.rows.last().map(|r| r.equity).unwrap_or(1.0)
    }

    /// Annualized growth proxy: `equity[last] ^ (periods_per_year / rows) - 1`
    ///
    /// Returns 0.0 for an empty table.
    pub fn cagr_proxy(&self, periods_per_year: f64) -> f64 {
        if self.rows.is_empty() {
            return 0.0;
        }
        self.last_equity().powf(periods_per_year / self.rows.len() as f64) - 1.0
    }
}
