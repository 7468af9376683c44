use axum::http::StatusCode;
use thiserror::Error;

/// Everything that can go wrong between a user action and the backend.
///
/// Every variant ends up as a single line in the status area; none of them
/// tear down the active view.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("{0}")]
    Network(String),

    /// Non-2xx with a JSON body carrying an `error` field.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// Non-2xx whose body was not JSON or had no usable `error` field.
    #[error("Server error: {status}")]
    ServerUnparseable { status: u16 },

    /// 2xx whose body did not match the expected shape.
    #[error("{0}")]
    Malformed(String),

    /// Rejected locally before any request was made.
    #[error("{0}")]
    Validation(String),
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

/// Error returned by the UI shell's own HTTP handlers.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
