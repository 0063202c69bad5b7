//! Error taxonomy shared by the token lifecycle, the upstream clients and the
//! HTTP layer.
//!
//! Every variant maps to an HTTP status via [`Error::status`]. At the request
//! boundary errors are rendered as `{ "success": false, "message": "..." }`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("No authorization code provided")]
    MissingAuthorizationCode,

    #[error("Failed to exchange code for tokens (provider returned {status})")]
    AuthExchangeFailed { status: u16 },

    #[error("Not authorized. Please login first.")]
    NotAuthorized,

    #[error("Failed to refresh token: {body}")]
    RefreshFailed { status: u16, body: String },

    #[error("Failed to get currently playing track")]
    ResourceFetchFailed { status: u16 },

    #[error("{service} API error: {message}")]
    Upstream {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("{0} is required")]
    MissingParameter(&'static str),

    #[error("invalid {name}: `{value}`")]
    InvalidParameter { name: &'static str, value: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("credential storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Status code reported to the inbound caller.
    pub fn status(&self) -> StatusCode {
        match self {
            Error::MissingAuthorizationCode
            | Error::AuthExchangeFailed { .. }
            | Error::ResourceFetchFailed { .. }
            | Error::MissingParameter(_)
            | Error::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
            Error::NotAuthorized => StatusCode::UNAUTHORIZED,
            Error::RefreshFailed { status, .. } | Error::Upstream { status, .. } => {
                upstream_status(*status)
            }
            Error::Config(_)
            | Error::Storage(_)
            | Error::Http(_)
            | Error::Json(_)
            | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Provider statuses that are not errors (or not valid at all) become 500.
fn upstream_status(status: u16) -> StatusCode {
    match StatusCode::from_u16(status) {
        Ok(code) if code.is_client_error() || code.is_server_error() => code,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            crate::warning!("Request failed with {}: {}", status, self);
        }

        let body = ErrorBody {
            success: false,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
