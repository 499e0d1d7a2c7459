use serde::{Deserialize, Serialize};

/// How ties with the current value are counted when ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankMethod {
    /// Fraction of window values <= current value
    #[default]
    Inclusive,
    /// Mean rank of the tied group, divided by the window size
    Average,
}

/// Fractional rank of the last value within `window`
pub fn percentile_of_last(window: &[f64], method: RankMethod) -> f64 {
    let n = window.len() as f64;
    let current = match window.last() {
        Some(v) => *v,
        None => return 0.5,
    };

    let below = window.iter().filter(|v| **v < current).count() as f64;
    let equal = window.iter().filter(|v| **v == current).count() as f64;

    match method {
        RankMethod::Inclusive => (below + equal) / n,
        RankMethod::Average => (below + (equal + 1.0) / 2.0) / n,
    }
}

/// Rolling percentile rank of each value within its trailing window
///
/// Steps without a full window of defined values are `None`.
pub fn rolling_percentile_rank(
    values: &[Option<f64>],
    window: usize,
    method: RankMethod,
) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let defined: Option<Vec<f64>> = values[i + 1 - window..=i].iter().copied().collect();
            defined.map(|xs| percentile_of_last(&xs, method))
        })
        .collect()
}

/// Replace undefined ranks with a fixed default (0.5 is neutral)
pub fn default_fill(values: &[Option<f64>], default: f64) -> Vec<f64> {
    values.iter().map(|v| v.unwrap_or(default)).collect()
}
