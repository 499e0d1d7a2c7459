use crate::error::{Error, Result};
use crate::models::PriceSeries;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Bernoulli, Distribution, Normal};
use serde::{Deserialize, Serialize};

/// Parameters of the synthetic log-return process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceProcessConfig {
    pub start_price: f64,
    pub base_sigma: f64,        // Std of everyday log-returns
    pub spike_probability: f64, // Chance of a volatility spike per step
    pub spike_sigma: f64,       // Std of the spike contribution
}

impl Default for PriceProcessConfig {
    fn default() -> Self {
        Self {
            start_price: 100.0,
            base_sigma: 0.01,
            spike_probability: 0.02,
            spike_sigma: 0.05,
        }
    }
}

impl PriceProcessConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.start_price.is_finite() || self.start_price <= 0.0 {
            return Err(Error::invalid(format!(
                "start_price must be finite and positive, got {}",
                self.start_price
            )));
        }
        if !self.base_sigma.is_finite() || self.base_sigma < 0.0 {
            return Err(Error::invalid("base_sigma must be finite and non-negative"));
        }
        if !self.spike_sigma.is_finite() || self.spike_sigma < 0.0 {
            return Err(Error::invalid("spike_sigma must be finite and non-negative"));
        }
        if !(0.0..=1.0).contains(&self.spike_probability) {
            return Err(Error::invalid("spike_probability must lie in [0, 1]"));
        }
        Ok(())
    }
}

/// Generates a geometric random walk with rare volatility spikes
///
/// The seed is the only entropy source, so the same seed and length always
/// reproduce the same path.
pub struct SyntheticDataGenerator {
    rng: StdRng,
    process: PriceProcessConfig,
}

impl SyntheticDataGenerator {
    /// Create a new generator with a seed for reproducibility
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            process: PriceProcessConfig::default(),
        }
    }

    pub fn with_process(mut self, process: PriceProcessConfig) -> Self {
        self.process = process;
        self
    }

    /// Generate `length` prices
    ///
    /// Log-returns are `N(0, base_sigma)` plus, with probability
    /// `spike_probability`, an extra `N(0, spike_sigma)` draw. The price is
    /// `start_price * exp(cumsum(log_returns))`.
    pub fn generate(&mut self, length: usize) -> Result<PriceSeries> {
        if length == 0 {
            return Err(Error::invalid("length must be a positive integer"));
        }
        self.process.validate()?;

        let base = Normal::new(0.0, self.process.base_sigma)
            .map_err(|e| Error::invalid(format!("base_sigma: {}", e)))?;
        let spike = Normal::new(0.0, self.process.spike_sigma)
            .map_err(|e| Error::invalid(format!("spike_sigma: {}", e)))?;
        let active = Bernoulli::new(self.process.spike_probability)
            .map_err(|e| Error::invalid(format!("spike_probability: {}", e)))?;

        // Draw order is fixed: steps, then spike flags, then spike sizes
        let steps: Vec<f64> = (0..length).map(|_| base.sample(&mut self.rng)).collect();
        let flags: Vec<bool> = (0..length).map(|_| active.sample(&mut self.rng)).collect();
        let spikes: Vec<f64> = (0..length).map(|_| spike.sample(&mut self.rng)).collect();

        let mut log_price = 0.0;
        let prices = steps
            .iter()
            .zip(&flags)
            .zip(&spikes)
            .map(|((step, &flag), spike)| {
                log_price += step + if flag { *spike } else { 0.0 };
                self.process.start_price * log_price.exp()
            })
            .collect();

        PriceSeries::new(prices)
    }
}

/// Generate a reproducible synthetic price series with default parameters
pub fn generate_prices(length: usize, seed: u64) -> Result<PriceSeries> {
    SyntheticDataGenerator::new(seed).generate(length)
}
