pub mod domain;
pub mod ingest;
pub mod time;
pub mod trend;

pub mod config {
    #[derive(Debug, Clone)]
    pub struct Settings {
        pub sentry_dsn: Option<String>,
        pub chart_base_url: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
                chart_base_url: std::env::var("CHART_BASE_URL").ok(),
            })
        }
    }
}
