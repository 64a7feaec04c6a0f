//! Outbound HTTP client construction.

use hyper::ext::ReasonPhrase;
use reqwest::{redirect, Client, Response};
use std::time::Duration;

/// Maximum number of redirects to follow before giving up.
pub const MAX_REDIRECTS: usize = 20;

/// Builds a client that follows redirects transparently and enforces a total
/// per-request timeout covering connect, headers and body.
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .use_rustls_tls()
        .redirect(redirect::Policy::limited(MAX_REDIRECTS))
        .timeout(timeout)
        .build()
}

/// Status text as sent by the upstream.
///
/// hyper only records the reason phrase when it differs from the canonical
/// one, and HTTP/2 carries none, so the canonical phrase fills the gap.
pub fn reason_phrase(response: &Response) -> String {
    match response.extensions().get::<ReasonPhrase>() {
        Some(reason) => String::from_utf8_lossy(reason.as_bytes()).into_owned(),
        None => response
            .status()
            .canonical_reason()
            .unwrap_or_default()
            .to_string(),
    }
}
