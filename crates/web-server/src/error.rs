use api_client::ApiError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// An upstream call failed; `message` is what the client sees.
    #[error("{message}")]
    Upstream {
        message: String,
        #[source]
        source: ApiError,
    },
    /// The metal price endpoint reports failures as `{ success: false, error }`.
    #[error("{message}")]
    MetalPrices {
        message: String,
        #[source]
        source: ApiError,
    },
    #[error("{0}")]
    BadRequest(String),
}

impl AppError {
    pub fn upstream(message: impl Into<String>, source: ApiError) -> Self {
        AppError::Upstream {
            message: message.into(),
            source,
        }
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Upstream { message, source } => {
                tracing::error!(error = %source, "Upstream call failed.");
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": message }))
            }
            AppError::MetalPrices { message, source } => {
                tracing::error!(error = %source, "Metals API call failed.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "success": false, "error": message }),
                )
            }
            AppError::BadRequest(message) => {
                tracing::warn!(%message, "Rejected request.");
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
        };

        (status, Json(body)).into_response()
    }
}
