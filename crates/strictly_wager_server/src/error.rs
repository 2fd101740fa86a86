//! Mapping of engine failures onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use strictly_wager::{EngineError, ErrorCategory, TokenError};
use tracing::warn;

/// JSON body of every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable failure kind.
    pub kind: String,
    /// Stable numeric code.
    pub code: u32,
    /// Human-readable description.
    pub message: String,
}

/// Error returned by request handlers.
#[derive(Debug, derive_more::Display)]
pub enum ApiError {
    /// The engine refused the action.
    #[display("{}", _0)]
    Engine(EngineError),

    /// The request carried no caller identity.
    #[display("Missing or malformed x-principal header")]
    MissingPrincipal,
}

impl std::error::Error for ApiError {}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        ApiError::Engine(err)
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        ApiError::Engine(EngineError::from(err))
    }
}

impl ApiError {
    /// HTTP status for the failure.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingPrincipal => StatusCode::UNAUTHORIZED,
            ApiError::Engine(err) => match err.category() {
                ErrorCategory::Validation => StatusCode::BAD_REQUEST,
                ErrorCategory::State => StatusCode::CONFLICT,
                ErrorCategory::Authorization => StatusCode::FORBIDDEN,
                ErrorCategory::NotFound => StatusCode::NOT_FOUND,
                ErrorCategory::External => StatusCode::BAD_GATEWAY,
                ErrorCategory::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Response body for the failure.
    pub fn body(&self) -> ErrorBody {
        let (kind, code) = match self {
            ApiError::MissingPrincipal => ("missing-principal", 2100),
            ApiError::Engine(err) => (err.kind(), err.code()),
        };
        ErrorBody {
            kind: kind.to_string(),
            code,
            message: self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(%status, error = %self, "Request failed");
        (status, Json(self.body())).into_response()
    }
}
