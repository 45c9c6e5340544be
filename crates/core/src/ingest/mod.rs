pub mod provider;
pub mod types;
pub mod yahoo;

pub use provider::HistoryProvider;
pub use yahoo::YahooChartClient;
