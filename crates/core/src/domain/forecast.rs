use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    Buy,
    Sell,
}

/// Parallel date/price columns. Invariant: `dates.len() == prices.len()`,
/// with `prices[i]` belonging to `dates[i]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesColumns {
    pub dates: Vec<NaiveDate>,
    pub prices: Vec<f64>,
}

/// The full analysis result for one ticker, serialized as the 200 body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendForecast {
    pub ticker: String,
    pub recommendation: Recommendation,
    pub historical_data: SeriesColumns,
    pub future_predictions: SeriesColumns,
}
