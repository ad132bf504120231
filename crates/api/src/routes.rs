use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{
        HeaderMap, HeaderValue, Method, StatusCode,
        header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_ORIGIN},
    },
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::error::{ErrorKind, ImportError};
use crate::import::{ImportResponse, run_import};
use crate::metrics::MetricsSnapshot;
use crate::state::AppState;

pub const ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// The import endpoint answers on every path; `/health` and `/metrics`
/// only claim GET and hand other methods to it.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check).fallback(import_endpoint))
        .route("/metrics", get(get_metrics).fallback(import_endpoint))
        .fallback(import_endpoint)
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn import_endpoint(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match method {
        // Pre-flight needs no credentials; the CORS headers come from the layers
        Method::OPTIONS => StatusCode::OK.into_response(),
        Method::POST => {
            let result = run_import(&state, &headers, &body).await;
            state.metrics.record_request(result.is_ok());
            match result {
                Ok(property) => (
                    StatusCode::OK,
                    Json(ImportResponse {
                        success: true,
                        property,
                    }),
                )
                    .into_response(),
                Err(e) => e.into_response(),
            }
        }
        other => ImportError::new(
            ErrorKind::MethodNotAllowed,
            format!("Method {} not allowed", other),
        )
        .into_response(),
    }
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn get_metrics(State(state): State<Arc<AppState>>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}
