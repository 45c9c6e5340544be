use serde::Deserialize;

/// Wire shape of the Yahoo v8 chart endpoint. Only the fields the pipeline
/// consumes are modeled; everything else is ignored on deserialize.
#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    #[serde(default)]
    pub meta: ChartMeta,
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

/// Exchange metadata. Timestamps are session opens in UTC; `gmtoffset` is
/// the exchange's offset in seconds, needed to recover the local trading
/// date.
#[derive(Debug, Default, Deserialize)]
pub struct ChartMeta {
    #[serde(default)]
    pub gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteBlock>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteBlock {
    // Sessions with no trade come back as nulls.
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}
