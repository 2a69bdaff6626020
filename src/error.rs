use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures of one enhancement attempt.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Failed to read image: {0}")]
    Read(#[from] std::io::Error),

    /// The request URL is stripped so credentials never reach the logs.
    #[error("Transport error: {0}")]
    Transport(reqwest::Error),

    #[error("Model service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Response contained no image part")]
    NoImagePart,
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        GatewayError::Transport(e.without_url())
    }
}

impl GatewayError {
    /// True when the service answered well-formed content without an image.
    pub fn is_missing_image(&self) -> bool {
        matches!(self, GatewayError::NoImagePart)
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found")]
    NotFound,

    #[error("No enhanced image is available for download")]
    DownloadUnavailable,
}

impl From<axum::extract::multipart::MultipartError> for ApiError {
    fn from(e: axum::extract::multipart::MultipartError) -> Self {
        ApiError::BadRequest(e.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::DownloadUnavailable => StatusCode::CONFLICT,
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
