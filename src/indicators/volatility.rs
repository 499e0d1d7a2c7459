//! Rolling volatility of close-to-close returns
//!
//! Rolling statistics are produced in two phases: the raw pass marks
//! steps with insufficient history as `None`, and a separate fill pass
//! decides what those steps become.

/// Period-over-period percentage change
///
/// The first entry is `None` (no prior observation).
pub fn pct_change(prices: &[f64]) -> Vec<Option<f64>> {
    let mut changes = Vec::with_capacity(prices.len());
    if prices.is_empty() {
        return changes;
    }

    changes.push(None);
    for pair in prices.windows(2) {
        changes.push(Some(pair[1] / pair[0] - 1.0));
    }

    changes
}

/// Sample standard deviation (n - 1) over a full trailing window
///
/// An entry is defined only when all `window` values ending at that step
/// are defined. For a `pct_change` input this leaves the first `window`
/// entries undefined.
pub fn rolling_std(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    if window < 2 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let slice = &values[i + 1 - window..=i];
            let defined: Option<Vec<f64>> = slice.iter().copied().collect();
            defined.map(|xs| sample_std(&xs))
        })
        .collect()
}

fn sample_std(xs: &[f64]) -> f64 {
    let n = xs.len() as f64;
    let mean = xs.iter().sum::<f64>() / n;
    let variance = xs
        .iter()
        .map(|x| {
            let diff = x - mean;
            diff * diff
        })
        .sum::<f64>()
        / (n - 1.0);

    variance.sqrt()
}

/// Replace every undefined entry with the next defined value after it
///
/// Trailing undefined entries (nothing defined after them) stay `None`.
pub fn backfill(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut filled = values.to_vec();
    let mut next = None;
    for slot in filled.iter_mut().rev() {
        match slot {
            Some(v) => next = Some(*v),
            None => *slot = next,
        }
    }
    filled
}

/// Rolling volatility of percentage changes, backfilled before use
pub fn rolling_volatility(prices: &[f64], window: usize) -> Vec<Option<f64>> {
    backfill(&rolling_std(&pct_change(prices), window))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pct_change() {
        let changes = pct_change(&[100.0, 110.0, 99.0]);
        assert_eq!(changes[0], None);
        assert!((changes[1].unwrap() - 0.10).abs() < 1e-12);
        assert!((changes[2].unwrap() + 0.10).abs() < 1e-12);

        assert!(pct_change(&[]).is_empty());
    }

    #[test]
    fn test_rolling_std_leading_undefined() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + (i % 3) as f64).collect();
        let vol = rolling_std(&pct_change(&prices), 20);

        assert_eq!(vol.len(), 30);
        assert!(vol[..20].iter().all(|v| v.is_none()));
        assert!(vol[20..].iter().all(|v| v.is_some()));
    }

    #[test]
    fn test_sample_std() {
        // Sample std of [2, 4, 4, 4, 5, 5, 7, 9] is sqrt(32 / 7)
        let xs = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((sample_std(&xs) - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_constant_prices_have_zero_volatility() {
        let prices = vec![100.0; 50];
        let vol = rolling_volatility(&prices, 20);
        assert!(vol.iter().all(|v| *v == Some(0.0)));
    }

    #[test]
    fn test_backfill() {
        let filled = backfill(&[None, None, Some(1.0), None, Some(2.0), None]);
        assert_eq!(
            filled,
            vec![Some(1.0), Some(1.0), Some(1.0), Some(2.0), Some(2.0), None]
        );
    }

    #[test]
    fn test_short_series_stays_undefined() {
        let prices = vec![100.0, 101.0, 102.0];
        let vol = rolling_volatility(&prices, 20);
        assert!(vol.iter().all(|v| v.is_none()));
    }
}
