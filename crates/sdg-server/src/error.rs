//! API errors mapped to HTTP status codes.
//!
//! Every error renders as `{"msg": "..."}`:
//! - `BadRequest` → 400
//! - `Upstream` → the status OpenAlex answered with
//! - `Internal` → 500

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sdg_ai::ClassifyError;
use sdg_chart::ChartError;
use sdg_openalex::FetchError;
use serde_json::json;
use tracing::{error, warn};

#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed request data (400).
    BadRequest(String),
    /// Metadata lookup answered with a non-2xx status.
    Upstream { status: StatusCode, message: String },
    /// Classification, rendering or transport failure (500).
    Internal(String),
}

impl ApiError {
    pub fn missing_field(field: &str) -> Self {
        Self::BadRequest(format!("Missing '{field}' in request data"))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { status, .. } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Upstream { message, .. } => {
                warn!(%status, %message, "upstream lookup failed");
                message
            }
            ApiError::Internal(msg) => {
                error!(error = %msg, "request failed");
                msg
            }
        };
        (status, Json(json!({ "msg": message }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<ClassifyError> for ApiError {
    fn from(e: ClassifyError) -> Self {
        match e {
            ClassifyError::EmptyText => Self::BadRequest(e.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<FetchError> for ApiError {
    fn from(e: FetchError) -> Self {
        match e.upstream_status() {
            Some(code) => Self::Upstream {
                status: StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_GATEWAY),
                message: format!("Failed to fetch data from OpenAlex: {code}"),
            },
            None => Self::Internal(format!("Failed to fetch data from OpenAlex: {e}")),
        }
    }
}

impl From<ChartError> for ApiError {
    fn from(e: ChartError) -> Self {
        match e {
            ChartError::Core(_) => Self::BadRequest(e.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}
