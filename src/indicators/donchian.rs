/// Donchian channel over the `lookback` bars before `index`
///
/// The bar at `index` itself is excluded, so a close can break out of the
/// channel it is compared against. Returns `(upper, lower)`, or None if
/// fewer than `lookback` prior bars exist or `lookback` is zero.
pub fn channel(prices: &[f64], index: usize, lookback: usize) -> Option<(f64, f64)> {
    if lookback == 0 || index < lookback || index > prices.len() {
        return None;
    }

    let window = &prices[index - lookback..index];
    let upper = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let lower = window.iter().copied().fold(f64::INFINITY, f64::min);

    Some((upper, lower))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_excludes_current_bar() {
        let prices = vec![10.0, 12.0, 11.0, 50.0];
        let (upper, lower) = channel(&prices, 3, 3).unwrap();
        assert_eq!(upper, 12.0);
        assert_eq!(lower, 10.0);
    }

    #[test]
    fn test_channel_insufficient_history() {
        let prices = vec![10.0, 12.0, 11.0];
        assert!(channel(&prices, 2, 3).is_none());
        assert!(channel(&prices, 2, 0).is_none());
    }
}
