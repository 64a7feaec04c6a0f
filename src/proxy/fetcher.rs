//! Server-side fetch of a page destined for an embedding frame.
//!
//! One GET per call, redirects followed by the client, body streamed into
//! memory up to a fixed cap.

use axum::http::header::CONTENT_TYPE;
use reqwest::Client;

use super::headers::{is_text_content, outbound_headers};
use super::types::{CheckRequest, ProxyResponse};
use crate::error::ProxyError;
use crate::infra::reason_phrase;

/// Declared type assumed when the upstream sends none.
const FALLBACK_CONTENT_TYPE: &str = "text/html";

pub async fn fetch_for_frame(
    client: &Client,
    request: &CheckRequest,
    max_body_bytes: usize,
) -> Result<ProxyResponse, ProxyError> {
    let mut response = client
        .get(request.target_url.clone())
        .headers(outbound_headers(request))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProxyError::Upstream {
            status: status.as_u16(),
            status_text: reason_phrase(&response),
        });
    }

    let declared_content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(FALLBACK_CONTENT_TYPE)
        .to_string();
    if !is_text_content(&declared_content_type) {
        tracing::warn!(
            url = %response.url(),
            content_type = %declared_content_type,
            "Serving non-HTML upstream content as text/html"
        );
    }

    if response
        .content_length()
        .is_some_and(|len| len > max_body_bytes as u64)
    {
        return Err(ProxyError::BodyTooLarge {
            limit: max_body_bytes,
        });
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if body.len() + chunk.len() > max_body_bytes {
            return Err(ProxyError::BodyTooLarge {
                limit: max_body_bytes,
            });
        }
        body.extend_from_slice(&chunk);
    }

    Ok(ProxyResponse {
        body: String::from_utf8_lossy(&body).into_owned(),
        declared_content_type,
        upstream_status: status.as_u16(),
    })
}
