use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trendcast_core::domain::forecast::TrendForecast;
use trendcast_core::ingest::{HistoryProvider, YahooChartClient};
use trendcast_core::trend::{forecast_ticker, ForecastError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = trendcast_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let provider = YahooChartClient::from_settings(&settings)?;
    let state = AppState {
        provider: Arc::new(provider),
    };

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/predict", get(predict))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Clone)]
struct AppState {
    provider: Arc<dyn HistoryProvider>,
}

#[derive(Debug, Deserialize)]
struct PredictQuery {
    ticker: Option<String>,
}

async fn predict(
    State(state): State<AppState>,
    Query(query): Query<PredictQuery>,
) -> Result<Json<TrendForecast>, ApiError> {
    // Only absent or empty counts as missing; the symbol is otherwise passed
    // through exactly as supplied.
    let ticker = query
        .ticker
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::MissingTicker)?;

    let today = Utc::now().date_naive();
    let forecast = forecast_ticker(state.provider.as_ref(), ticker, today).await?;

    Ok(Json(forecast))
}

#[derive(Debug)]
enum ApiError {
    MissingTicker,
    UnknownTicker(String),
    Internal(anyhow::Error),
}

impl From<ForecastError> for ApiError {
    fn from(err: ForecastError) -> Self {
        match err {
            ForecastError::NoData { ticker } => ApiError::UnknownTicker(ticker),
            ForecastError::Internal(err) => ApiError::Internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::MissingTicker => (
                StatusCode::BAD_REQUEST,
                "Ticker symbol is required.".to_string(),
            ),
            ApiError::UnknownTicker(ticker) => (
                StatusCode::NOT_FOUND,
                format!("Could not find data for ticker '{ticker}'. Check the symbol."),
            ),
            ApiError::Internal(err) => {
                sentry_anyhow::capture_anyhow(&err);
                tracing::error!(error = %err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("An internal error occurred: {err:#}"),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &trendcast_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
