use crate::domain::forecast::{Recommendation, SeriesColumns, TrendForecast};
use crate::domain::series::DailyClose;
use crate::ingest::provider::HistoryProvider;
use crate::time::date_ordinal;
use crate::trend::ols;
use anyhow::Context;
use chrono::{Duration, NaiveDate};
use std::fmt;

/// Start of the fetch window for every request.
pub const HISTORY_START: NaiveDate = match NaiveDate::from_ymd_opt(2020, 1, 1) {
    Some(d) => d,
    None => panic!("invalid history start"),
};

/// Last extrapolated calendar day, inclusive.
pub const HORIZON_END: NaiveDate = match NaiveDate::from_ymd_opt(2027, 12, 31) {
    Some(d) => d,
    None => panic!("invalid horizon end"),
};

#[derive(Debug)]
pub enum ForecastError {
    /// The provider knows nothing about the symbol.
    NoData { ticker: String },
    /// Any other failure: transport, malformed data, fit.
    Internal(anyhow::Error),
}

impl fmt::Display for ForecastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForecastError::NoData { ticker } => {
                write!(f, "no price history for ticker '{ticker}'")
            }
            ForecastError::Internal(err) => write!(f, "{err:#}"),
        }
    }
}

impl std::error::Error for ForecastError {}

/// Runs the whole analysis for one ticker: fetch daily closes over
/// [HISTORY_START, today], fit a linear trend on the date ordinals, and
/// extrapolate through HORIZON_END.
pub async fn forecast_ticker(
    provider: &dyn HistoryProvider,
    ticker: &str,
    today: NaiveDate,
) -> Result<TrendForecast, ForecastError> {
    let history = provider
        .fetch_daily_closes(ticker, HISTORY_START, today)
        .await
        .map_err(ForecastError::Internal)?;

    tracing::info!(
        %ticker,
        provider = provider.provider_name(),
        rows = history.len(),
        "fetched daily history"
    );

    forecast_from_history(ticker, &history)
}

/// The deterministic tail of the pipeline: everything after the fetch.
pub fn forecast_from_history(
    ticker: &str,
    history: &[DailyClose],
) -> Result<TrendForecast, ForecastError> {
    if history.is_empty() {
        return Err(ForecastError::NoData {
            ticker: ticker.to_string(),
        });
    }
    build_forecast(ticker, history).map_err(ForecastError::Internal)
}

fn build_forecast(ticker: &str, history: &[DailyClose]) -> anyhow::Result<TrendForecast> {
    let xs: Vec<f64> = history
        .iter()
        .map(|row| date_ordinal(row.date) as f64)
        .collect();
    let ys: Vec<f64> = history.iter().map(|row| row.close).collect();

    let model = ols::fit(&xs, &ys)?;

    let last = history.last().context("history is empty")?;

    let mut future_dates = Vec::new();
    let mut future_prices = Vec::new();
    let mut date = last.date + Duration::days(1);
    while date <= HORIZON_END {
        future_dates.push(date);
        future_prices.push(model.predict(date_ordinal(date) as f64));
        date += Duration::days(1);
    }

    let last_predicted = future_prices
        .last()
        .copied()
        .context("no forecast dates remain before the horizon end")?;

    let recommendation = if last_predicted > last.close {
        Recommendation::Buy
    } else {
        Recommendation::Sell
    };

    Ok(TrendForecast {
        ticker: ticker.to_string(),
        recommendation,
        historical_data: SeriesColumns {
            dates: history.iter().map(|row| row.date).collect(),
            prices: ys,
        },
        future_predictions: SeriesColumns {
            dates: future_dates,
            prices: future_prices,
        },
    })
}
