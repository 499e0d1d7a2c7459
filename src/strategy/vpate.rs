use super::{SignalSeries, Strategy};
use crate::error::{Error, Result};
use crate::indicators::{
    channel, default_fill, rolling_percentile_rank, rolling_volatility, RankMethod,
};
use serde::{Deserialize, Serialize};

/// Configuration for the volatility-adaptive breakout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    pub vol_window: usize,       // Rolling std window over returns
    pub rank_window: usize,      // Trailing window for the percentile rank
    pub rank_method: RankMethod,
    pub neutral_rank: f64,       // Rank used while the window is incomplete
    pub base_lookback: usize,
    pub low_vol_lookback: usize, // Used when rank < low_vol_threshold
    pub high_vol_lookback: usize, // Used when rank > high_vol_threshold
    pub low_vol_threshold: f64,
    pub high_vol_threshold: f64,
    pub min_lookback: usize,
    pub max_lookback: usize,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            vol_window: 20,
            rank_window: 252,
            rank_method: RankMethod::Inclusive,
            neutral_rank: 0.5,
            base_lookback: 50,
            low_vol_lookback: 30,
            high_vol_lookback: 80,
            low_vol_threshold: 0.3,
            high_vol_threshold: 0.7,
            min_lookback: 10,
            max_lookback: 200,
        }
    }
}

impl StrategyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.vol_window < 2 {
            return Err(Error::invalid("vol_window must be at least 2"));
        }
        if self.rank_window == 0 {
            return Err(Error::invalid("rank_window must be positive"));
        }
        if self.min_lookback == 0 || self.min_lookback > self.max_lookback {
            return Err(Error::invalid(format!(
                "lookback bounds must satisfy 0 < min <= max, got [{}, {}]",
                self.min_lookback, self.max_lookback
            )));
        }
        let in_unit = |x: f64| (0.0..=1.0).contains(&x);
        if !in_unit(self.neutral_rank)
            || !in_unit(self.low_vol_threshold)
            || !in_unit(self.high_vol_threshold)
            || self.low_vol_threshold > self.high_vol_threshold
        {
            return Err(Error::invalid(
                "rank thresholds must lie in [0, 1] with low <= high",
            ));
        }
        Ok(())
    }

    /// Lookback for a given volatility rank, clamped to the configured bounds
    ///
    /// Low volatility shortens the channel, high volatility lengthens it.
    pub fn adaptive_lookback(&self, rank: f64) -> usize {
        let lookback = if rank < self.low_vol_threshold {
            self.low_vol_lookback
        } else if rank > self.high_vol_threshold {
            self.high_vol_lookback
        } else {
            self.base_lookback
        };

        lookback.clamp(self.min_lookback, self.max_lookback)
    }
}

/// Donchian breakout whose lookback adapts to the volatility regime
///
/// Volatility is the rolling std of percentage changes; its percentile rank
/// within a trailing window picks one of three channel lengths. The strategy
/// goes long on a close above the channel, flat on a close below it and
/// otherwise keeps its previous position.
#[derive(Debug, Clone, Default)]
pub struct VolatilityBreakoutStrategy {
    config: StrategyConfig,
}

impl VolatilityBreakoutStrategy {
    pub fn new(config: StrategyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Volatility percentile rank per step
    ///
    /// Only the volatility input is backfilled. Steps before the rank window
    /// fills take `neutral_rank`.
    pub fn volatility_rank(&self, prices: &[f64]) -> Vec<f64> {
        let vol = rolling_volatility(prices, self.config.vol_window);
        let ranks = rolling_percentile_rank(&vol, self.config.rank_window, self.config.rank_method);
        default_fill(&ranks, self.config.neutral_rank)
    }

    /// Breakout positions for the given per-step lookbacks
    pub fn positions(prices: &[f64], lookbacks: &[usize]) -> Vec<f64> {
        prices
            .iter()
            .zip(lookbacks)
            .enumerate()
            .scan(0.0, |prev, (i, (&price, &lookback))| {
                let pos = if i < lookback + 1 {
                    0.0
                } else {
                    match channel(prices, i, lookback) {
                        Some((upper, _)) if price > upper => 1.0,
                        Some((_, lower)) if price < lower => 0.0,
                        _ => *prev,
                    }
                };
                *prev = pos;
                Some(pos)
            })
            .collect()
    }
}

impl Strategy for VolatilityBreakoutStrategy {
    fn signals(&self, prices: &[f64]) -> Result<SignalSeries> {
        let vpr = self.volatility_rank(prices);
        let lookbacks: Vec<usize> = vpr
            .iter()
            .map(|&rank| self.config.adaptive_lookback(rank))
            .collect();
        let positions = Self::positions(prices, &lookbacks);

        Ok(SignalSeries {
            positions,
            vpr,
            lookbacks,
        })
    }

    fn name(&self) -> &str {
        "VolatilityBreakoutStrategy"
    }

    fn min_samples_required(&self) -> usize {
        // Shortest reachable channel plus the bar being tested
        let config = &self.config;
        [
            config.low_vol_lookback,
            config.base_lookback,
            config.high_vol_lookback,
        ]
        .iter()
        .map(|l| (*l).clamp(config.min_lookback, config.max_lookback))
        .min()
        .unwrap_or(config.min_lookback)
            + 1
    }
}
