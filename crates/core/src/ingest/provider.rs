use crate::domain::series::DailyClose;
use anyhow::Result;
use chrono::NaiveDate;

/// Source of daily closing prices for a ticker over a date range.
///
/// Rows are returned in ascending date order with no duplicate dates. A
/// symbol the provider does not know yields `Ok` with zero rows; transport
/// and decoding failures yield `Err`.
#[async_trait::async_trait]
pub trait HistoryProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn fetch_daily_closes(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyClose>>;
}
