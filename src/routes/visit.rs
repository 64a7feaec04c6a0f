use axum::{
    extract::{rejection::QueryRejection, Query},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::proxy::parse_target;
use crate::settings::{clamp_delay, normalize_url};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitQuery {
    pub url: Option<String>,
    pub delay_seconds: Option<u32>,
}

/// `GET /api/visit`: waits out the configured delay, then redirects to the
/// target. Closing the connection abandons the wait.
pub async fn visit_url(query: Result<Query<VisitQuery>, QueryRejection>) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            return bad_request(&format!("Invalid query: {}", rejection.body_text()))
        }
    };

    let Some(raw) = query.url.as_deref().and_then(normalize_url) else {
        return bad_request("Please enter a valid URL");
    };
    // The parser drops stray whitespace and control characters; redirect to
    // its serialisation so the Location header is always valid.
    let Ok(target) = parse_target(&raw) else {
        return bad_request("Invalid URL format");
    };

    if let Some(seconds) = query.delay_seconds {
        let delay = clamp_delay(seconds);
        tracing::debug!(url = %target, delay_secs = delay.as_secs(), "Delaying visit");
        tokio::time::sleep(delay).await;
    }

    Redirect::to(target.as_str()).into_response()
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}
