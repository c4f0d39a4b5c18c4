use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Handler error taxonomy. Every variant renders the shared
/// `{success: false, ...}` envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Validation {
        message: String,
        errors: Option<Vec<String>>,
    },

    #[error("{0}")]
    NotFound(String),

    /// Database call failed for any other reason. The raw message is
    /// surfaced to the client; fine for an internal deployment.
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            errors: None,
        }
    }

    pub fn validation_errors(message: impl Into<String>, errors: Vec<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            errors: Some(errors),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation { message, errors } => {
                let mut body = json!({ "success": false, "message": message });
                if let Some(errors) = errors {
                    body["errors"] = json!(errors);
                }
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "success": false, "message": message })),
            )
                .into_response(),
            ApiError::Upstream(err) => {
                error!("upstream failure: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "message": "Internal server error",
                        "error": err.to_string(),
                    })),
                )
                    .into_response()
            }
        }
    }
}

pub(crate) fn join_error(err: tokio::task::JoinError) -> ApiError {
    error!("spawn_blocking join error: {}", err);
    ApiError::Upstream(anyhow::anyhow!("worker task failed: {err}"))
}
