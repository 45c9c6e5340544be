pub mod ols;
pub mod pipeline;

pub use ols::LinearTrend;
pub use pipeline::{forecast_ticker, ForecastError};
