// Technical indicators module
// Rolling volatility, percentile rank and Donchian channel

pub mod donchian;
pub mod percentile;
pub mod volatility;

pub use donchian::channel;
pub use percentile::{default_fill, percentile_of_last, rolling_percentile_rank, RankMethod};
pub use volatility::{backfill, pct_change, rolling_std, rolling_volatility};
