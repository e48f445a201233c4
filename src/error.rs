//! Error types.
//!
//! [`Error`] surfaces infrastructure failures: bad configuration, binding to
//! a port. [`ApiError`] is what a handler returns when a request cannot be
//! served; it converts into the matching status and a plain-text body.

use tracing::error;

use crate::response::{IntoResponse, Response};
use crate::status::Status;

/// The error type returned by the crate's fallible startup operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("config: {key}={value:?} {reason}")]
    Config {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// A request-level failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The client sent something unusable. The message is sent verbatim.
    #[error("{0}")]
    BadRequest(String),

    #[error("Unauthorized: Invalid or missing API Key.")]
    Unauthorized,

    #[error("Product not found")]
    NotFound,

    /// Anything unexpected. The detail is logged server-side only.
    #[error("internal: {0}")]
    Internal(String),
}

/// The only body a client ever sees for a `500`.
pub const INTERNAL_ERROR_BODY: &str = "Something went wrong on the server!";

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::BadRequest(msg) => (Status::BadRequest, msg),
            Self::Unauthorized => (Status::Unauthorized, Self::Unauthorized.to_string()),
            Self::NotFound => (Status::NotFound, Self::NotFound.to_string()),
            Self::Internal(detail) => {
                error!(%detail, "internal error");
                (Status::InternalServerError, INTERNAL_ERROR_BODY.to_owned())
            }
        };
        Response::builder().status(status).text(body)
    }
}
