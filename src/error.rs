use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub const URL_REQUIRED: &str = "URL parameter is required";
pub const INVALID_URL_FORMAT: &str = "Invalid URL format";

/// Failures surfaced by the proxy fetcher.
///
/// Each variant maps to exactly one HTTP status; none of them are retried.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Missing or malformed target. No network call has been made.
    #[error("{0}")]
    InvalidInput(String),

    /// Upstream answered, but with a non-2xx final status.
    #[error("Failed to fetch: {}", status_line(.status, .status_text))]
    Upstream { status: u16, status_text: String },

    /// DNS, connect, TLS, timeout, redirect loop or any other transport failure.
    #[error("Proxy error: {}", error_chain(.0))]
    Network(#[from] reqwest::Error),

    #[error("Proxy error: response body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },
}

impl ProxyError {
    pub fn url_required() -> Self {
        ProxyError::InvalidInput(URL_REQUIRED.to_string())
    }

    pub fn invalid_url() -> Self {
        ProxyError::InvalidInput(INVALID_URL_FORMAT.to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ProxyError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ProxyError::Network(_) | ProxyError::BodyTooLarge { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

fn status_line(status: &u16, status_text: &str) -> String {
    if status_text.is_empty() {
        status.to_string()
    } else {
        format!("{} {}", status, status_text)
    }
}

/// Renders an error with its sources, outermost first.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
