//! HTTP layer: routes requests to the classifier, the OpenAlex fetcher and the chart renderer.

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use sdg_ai::Classify;
use sdg_chart::ChartOptions;
use sdg_openalex::OpenAlexClient;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Shared read-only state, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn Classify>,
    pub openalex: Arc<OpenAlexClient>,
    pub chart: Arc<ChartOptions>,
}

impl AppState {
    pub fn new(
        classifier: Arc<dyn Classify>,
        openalex: OpenAlexClient,
        chart: ChartOptions,
    ) -> Self {
        Self {
            classifier,
            openalex: Arc::new(openalex),
            chart: Arc::new(chart),
        }
    }
}

/// Build the router. `cors_allow_origin` is a comma-separated origin list; unset allows any.
pub fn build_app(state: AppState, cors_allow_origin: Option<&str>) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/goals", get(handlers::goals))
        .route("/classify", post(handlers::classify))
        .route("/classify/", post(handlers::classify))
        .route("/fetch-and-classify", post(handlers::fetch_and_classify))
        .route("/fetch-and-classify/", post(handlers::fetch_and_classify))
        .route("/plot", post(handlers::plot))
        .route("/plot/", post(handlers::plot))
        .with_state(state)
        .layer(cors_layer(cors_allow_origin))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(allow_origin: Option<&str>) -> CorsLayer {
    let origins: Vec<HeaderValue> = allow_origin
        .unwrap_or_default()
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}
