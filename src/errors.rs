use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application-specific error types.
#[derive(Debug)]
pub enum AppError {
    /// Database-related errors (persistence failures are fatal to the operation).
    Database(sqlx::Error),
    /// Resource not found error.
    NotFound(String),
    /// Caller-supplied data is malformed.
    Validation(String),
    /// Authentication against the admin service failed.
    /// Carries the upstream status code (502 when the upstream gave none).
    Auth {
        /// Status code inherited from the admin login endpoint.
        status: StatusCode,
        /// Description of the failure.
        message: String,
    },
    /// An admin service call failed or timed out.
    /// Status code inherited from upstream, 502/504 by default.
    Upstream {
        /// Status code inherited from the admin service.
        status: StatusCode,
        /// Description of the failure.
        message: String,
    },
    /// Internal server error.
    Internal(String),
}

impl AppError {
    /// Builds an upstream error from a reqwest failure, mapping timeouts to 504.
    pub fn from_upstream(context: &str, err: reqwest::Error) -> Self {
        let status = if err.is_timeout() {
            StatusCode::GATEWAY_TIMEOUT
        } else {
            StatusCode::BAD_GATEWAY
        };
        AppError::Upstream {
            status,
            message: format!("{}: {}", context, err),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Database(e) => write!(f, "Database error: {}", e),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::Auth { status, message } => {
                write!(f, "Admin auth failed ({}): {}", status, message)
            }
            AppError::Upstream { status, message } => {
                write!(f, "Admin service error ({}): {}", status, message)
            }
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Maps each variant to its originating status code and the
    /// `{success: false, message}` envelope the routing layer exposes.
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Unable to save inspection request".to_string(),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Auth { status, message } => {
                tracing::error!("Admin auth failed ({}): {}", status, message);
                (status, message)
            }
            AppError::Upstream { status, message } => {
                tracing::error!("Admin service error ({}): {}", status, message);
                (status, message)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "message": message,
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::from_upstream("admin service request failed", err)
    }
}
