use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use super::AppState;
use crate::settings::normalize_url;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckQuery {
    pub url: Option<String>,
    pub user_agent: Option<String>,
}

/// `GET /api/check`: direct probe, always answered with a `ProbeReport`
/// unless the input is blank.
pub async fn check_url(
    State(state): State<AppState>,
    query: Result<Query<CheckQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            return bad_request(&format!("Invalid query: {}", rejection.body_text()))
        }
    };
    let Some(url) = query.url.as_deref().and_then(normalize_url) else {
        return bad_request("Please enter a valid URL");
    };

    tracing::debug!(url = %url, "Probing");
    let report = state.probe.check(&url, query.user_agent.as_deref()).await;
    Json(report).into_response()
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}
