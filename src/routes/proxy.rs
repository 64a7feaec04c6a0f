use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{IntoResponse, Response},
};

use super::AppState;
use crate::error::ProxyError;
use crate::proxy::{frame_headers, ProxyQuery};

/// `GET /proxy`: re-serves the target page so it can be framed.
pub async fn proxy_page(
    State(state): State<AppState>,
    query: Result<Query<ProxyQuery>, QueryRejection>,
) -> Result<Response, ProxyError> {
    let Query(query) = query.map_err(|rejection| {
        ProxyError::InvalidInput(format!("Invalid query: {}", rejection.body_text()))
    })?;
    let request = query.into_check_request()?;

    tracing::debug!(
        url = %request.target_url,
        anonymous_mode = request.anonymous_mode,
        fake_ip = request.fake_ip,
        "Proxying page"
    );

    match state.proxy.fetch(request).await {
        Ok(page) => {
            tracing::debug!(
                status = page.upstream_status,
                bytes = page.body.len(),
                "Proxy fetch succeeded"
            );
            Ok((frame_headers(), page.body).into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Proxy fetch failed");
            Err(e)
        }
    }
}
