use crate::config::Settings;
use crate::domain::series::DailyClose;
use crate::ingest::provider::HistoryProvider;
use crate::ingest::types::{ChartResponse, ChartResult};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime};
use std::time::Duration as StdDuration;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// The chart endpoint returns 429 to clients without a browser user agent.
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko)";

/// Daily close history fetched from the Yahoo v8 chart API.
#[derive(Debug, Clone)]
pub struct YahooChartClient {
    http: reqwest::Client,
    base_url: String,
}

impl YahooChartClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings
            .chart_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = std::env::var("CHART_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(StdDuration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build chart http client")?;

        Ok(Self { http, base_url })
    }

    fn url(&self, ticker: &str) -> String {
        format!(
            "{}/v8/finance/chart/{}",
            self.base_url.trim_end_matches('/'),
            ticker
        )
    }
}

#[async_trait::async_trait]
impl HistoryProvider for YahooChartClient {
    fn provider_name(&self) -> &'static str {
        "yahoo_chart"
    }

    async fn fetch_daily_closes(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyClose>> {
        let period1 = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        // Upper bound is exclusive at the following midnight so `end` itself
        // is covered.
        let period2 = (end + Duration::days(1))
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp();

        let res = self
            .http
            .get(self.url(ticker))
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
                ("events", "history".to_string()),
            ])
            .send()
            .await
            .context("chart request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read chart response")?;

        closes_from_body(ticker, status, &text)
    }
}

/// Everything after the transport: parse the body, classify chart-level
/// errors as "no rows", fail on any other non-success status.
fn closes_from_body(
    ticker: &str,
    status: reqwest::StatusCode,
    text: &str,
) -> Result<Vec<DailyClose>> {
    let parsed = serde_json::from_str::<ChartResponse>(text)
        .with_context(|| format!("chart response is not valid JSON: {text}"))?;

    // Unknown or delisted symbols come back as a chart-level error payload,
    // which the pipeline treats as "no rows".
    if let Some(err) = &parsed.chart.error {
        tracing::warn!(
            %ticker,
            code = %err.code,
            description = %err.description,
            "chart api reported no data for symbol"
        );
        return Ok(Vec::new());
    }

    if !status.is_success() {
        anyhow::bail!("chart api HTTP {status}: {text}");
    }

    let Some(result) = parsed.chart.result.and_then(|mut r| {
        if r.is_empty() {
            None
        } else {
            Some(r.remove(0))
        }
    }) else {
        return Ok(Vec::new());
    };

    rows_from_chart(result)
}

/// Pairs timestamps with closes in wire order, skipping null closes.
///
/// Timestamps are UTC session opens; the exchange's `gmtoffset` is applied
/// before taking the calendar date, so markets east of UTC keep their local
/// trading date instead of slipping back a day.
fn rows_from_chart(result: ChartResult) -> Result<Vec<DailyClose>> {
    let closes = match result.indicators.quote.first() {
        Some(block) => &block.close,
        None => return Ok(Vec::new()),
    };
    let gmtoffset = result.meta.gmtoffset;

    let mut out = Vec::with_capacity(result.timestamp.len());
    for (ts, close) in result.timestamp.iter().zip(closes.iter()) {
        let Some(close) = close else {
            continue;
        };
        let local = ts
            .checked_add(gmtoffset)
            .with_context(|| format!("chart timestamp out of range: {ts}"))?;
        let date = DateTime::from_timestamp(local, 0)
            .with_context(|| format!("chart timestamp out of range: {ts}"))?
            .date_naive();
        out.push(DailyClose {
            date,
            close: *close,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(v: serde_json::Value) -> ChartResponse {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn parses_chart_payload_into_dated_closes() {
        // 2020-01-02 and 2020-01-03, 14:30 UTC = 09:30 New York open.
        let resp = parse(json!({
            "chart": {
                "result": [{
                    "meta": {"gmtoffset": -18_000},
                    "timestamp": [1_577_975_400, 1_578_061_800],
                    "indicators": {
                        "quote": [{"close": [100.0, 110.0]}]
                    }
                }],
                "error": null
            }
        }));

        let mut results = resp.chart.result.unwrap();
        let rows = rows_from_chart(results.remove(0)).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2020, 1, 2).unwrap());
        assert_eq!(rows[0].close, 100.0);
        assert_eq!(rows[1].date, NaiveDate::from_ymd_opt(2020, 1, 3).unwrap());
        assert_eq!(rows[1].close, 110.0);
    }

    #[test]
    fn exchange_offset_keeps_the_local_trading_date_east_of_utc() {
        // NZX open: 2020-01-06 10:00 NZDT = 2020-01-05 21:00 UTC. Without
        // the offset the row would land on the previous calendar day.
        let resp = parse(json!({
            "chart": {
                "result": [{
                    "meta": {"gmtoffset": 46_800},
                    "timestamp": [1_578_258_000],
                    "indicators": {
                        "quote": [{"close": [7.5]}]
                    }
                }],
                "error": null
            }
        }));

        let mut results = resp.chart.result.unwrap();
        let rows = rows_from_chart(results.remove(0)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2020, 1, 6).unwrap());
    }

    #[test]
    fn skips_sessions_with_null_close() {
        let resp = parse(json!({
            "chart": {
                "result": [{
                    "timestamp": [1_577_975_400, 1_578_061_800, 1_578_321_000],
                    "indicators": {
                        "quote": [{"close": [100.0, null, 120.0]}]
                    }
                }],
                "error": null
            }
        }));

        let mut results = resp.chart.result.unwrap();
        let rows = rows_from_chart(results.remove(0)).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].close, 100.0);
        assert_eq!(rows[1].close, 120.0);
    }

    #[test]
    fn error_payload_parses_with_no_result() {
        let resp = parse(json!({
            "chart": {
                "result": null,
                "error": {
                    "code": "Not Found",
                    "description": "No data found, symbol may be delisted"
                }
            }
        }));

        assert!(resp.chart.result.is_none());
        let err = resp.chart.error.unwrap();
        assert_eq!(err.code, "Not Found");
    }

    #[test]
    fn error_payload_body_yields_no_rows() {
        // Unknown symbols arrive as HTTP 404 plus a chart-level error; both
        // together must read as an empty history, not a failure.
        let body = json!({
            "chart": {
                "result": null,
                "error": {
                    "code": "Not Found",
                    "description": "No data found, symbol may be delisted"
                }
            }
        })
        .to_string();

        let rows = closes_from_body("NOPE", reqwest::StatusCode::NOT_FOUND, &body).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn non_success_status_without_error_payload_is_a_failure() {
        let body = json!({
            "chart": {"result": null, "error": null}
        })
        .to_string();

        let err = closes_from_body("ABC", reqwest::StatusCode::INTERNAL_SERVER_ERROR, &body)
            .unwrap_err();
        assert!(err.to_string().contains("chart api HTTP"));
    }

    #[test]
    fn successful_body_parses_into_rows() {
        let body = json!({
            "chart": {
                "result": [{
                    "meta": {"gmtoffset": -18_000},
                    "timestamp": [1_577_975_400],
                    "indicators": {
                        "quote": [{"close": [100.0]}]
                    }
                }],
                "error": null
            }
        })
        .to_string();

        let rows = closes_from_body("ABC", reqwest::StatusCode::OK, &body).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2020, 1, 2).unwrap());
    }

    #[test]
    fn missing_quote_block_yields_no_rows() {
        let resp = parse(json!({
            "chart": {
                "result": [{
                    "timestamp": [1_577_975_400],
                    "indicators": {"quote": []}
                }],
                "error": null
            }
        }));

        let mut results = resp.chart.result.unwrap();
        let rows = rows_from_chart(results.remove(0)).unwrap();
        assert!(rows.is_empty());
    }
}
