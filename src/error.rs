use serde::Serialize;
use thiserror::Error;

// Import Axum types for HTTP response conversion
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Message returned to clients when the store is not configured.
pub const NOT_CONFIGURED: &str = "Server not configured";
/// Message returned to clients when the insert fails for a reason other than a duplicate.
pub const INSERT_FAILED: &str = "DB insert failed";
/// Message returned to clients for anything unexpected.
pub const SERVER_ERROR: &str = "Server error";

/// Point in the signup handler at which a request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Validate,
    Env,
    Db,
    Unhandled,
}

/// The custom error type for the application.
#[derive(Debug, Error)]
pub enum Error {
    /// Client input is malformed. The message is shown to the client verbatim.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The server is missing configuration it needs to handle the request.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Persisting the signup failed for a reason other than a duplicate email.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Anything else.
    #[error("Unhandled error: {0}")]
    Unhandled(String),
}

/// A type alias for `Result<T, Error>` to simplify function signatures.
pub type Result<T> = std::result::Result<T, Error>;

/// JSON body of every failed signup response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub ok: bool,
    pub stage: Stage,
    pub error: String,
}

impl Error {
    pub fn stage(&self) -> Stage {
        match self {
            Error::Validation(_) => Stage::Validate,
            Error::Config(_) => Stage::Env,
            Error::Storage(_) => Stage::Db,
            Error::Unhandled(_) => Stage::Unhandled,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Config(_) | Error::Storage(_) | Error::Unhandled(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Text safe to send to the client. Details of server-side failures stay in the log.
    pub fn public_message(&self) -> String {
        match self {
            Error::Validation(msg) => msg.clone(),
            Error::Config(_) => NOT_CONFIGURED.to_string(),
            Error::Storage(_) => INSERT_FAILED.to_string(),
            Error::Unhandled(_) => SERVER_ERROR.to_string(),
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            ok: false,
            stage: self.stage(),
            error: self.public_message(),
        }
    }
}

/// Convert custom Error to HTTP response
///
/// Each variant maps to a status code and a `{ ok: false, stage, error }` body.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self {
            Error::Validation(msg) => tracing::debug!(error = %msg, "Rejected signup"),
            Error::Config(msg) => tracing::error!(error = %msg, "Signup endpoint misconfigured"),
            Error::Storage(msg) => tracing::error!(error = %msg, "Signup insert failed"),
            Error::Unhandled(msg) => tracing::error!(error = %msg, "Unhandled signup error"),
        }

        (self.status_code(), Json(self.body())).into_response()
    }
}
