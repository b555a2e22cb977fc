/// Error types for Avatar Service
///
/// Every failure the service can hit, from request validation through the
/// Gemini, Storage and Firestore calls. Errors are converted to JSON
/// `{"error": ...}` responses for API clients.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;

/// Result type for avatar-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Resource not found (missing base photo, missing trip document)
    #[error("Not found: {0}")]
    NotFound(String),

    /// An external API (Gemini, Storage, Firestore) failed or answered non-2xx
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Decoding, resizing or encoding an image failed
    #[error("Image error: {0}")]
    Image(String),

    /// Configuration or credentials problem
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Message sent to the caller. Validation messages go out verbatim.
    pub fn client_message(&self) -> String {
        match self {
            AppError::BadRequest(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Image(_) | AppError::Config(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.client_message() }))
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Internal(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Internal(msg.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Upstream(err.to_string())
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::Image(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
