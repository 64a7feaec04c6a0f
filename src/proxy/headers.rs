//! Outbound and frame-facing header synthesis.

use axum::http::{
    header::{CONTENT_SECURITY_POLICY, CONTENT_TYPE, USER_AGENT, X_FRAME_OPTIONS},
    HeaderMap, HeaderName, HeaderValue,
};
use rand::Rng;
use std::net::Ipv4Addr;

use super::types::CheckRequest;

/// Desktop browser identification sent when the caller supplies none.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

pub const LOOPBACK: &str = "127.0.0.1";

pub const FRAME_CONTENT_TYPE: &str = "text/html; charset=utf-8";

pub const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");
pub const X_REAL_IP: HeaderName = HeaderName::from_static("x-real-ip");

/// Builds the headers for the upstream GET.
///
/// `fake_ip` overrides the forwarded-for value set by `anonymous_mode`, while
/// the real-ip header stays on loopback whenever anonymous mode is on.
pub fn outbound_headers(request: &CheckRequest) -> HeaderMap {
    let mut headers = HeaderMap::new();

    let user_agent = request
        .user_agent
        .as_deref()
        .and_then(|ua| HeaderValue::from_str(ua).ok())
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_USER_AGENT));
    headers.insert(USER_AGENT, user_agent);

    if request.anonymous_mode {
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static(LOOPBACK));
        headers.insert(X_REAL_IP, HeaderValue::from_static(LOOPBACK));
    }

    if request.fake_ip {
        let spoofed = random_ipv4().to_string();
        if let Ok(value) = HeaderValue::from_str(&spoofed) {
            headers.insert(X_FORWARDED_FOR, value);
        }
    }

    headers
}

/// Four independent uniform octets, drawn fresh on every call.
pub fn random_ipv4() -> Ipv4Addr {
    let octets: [u8; 4] = rand::thread_rng().gen();
    Ipv4Addr::from(octets)
}

/// Headers attached to a successful proxy response so it can be framed.
pub fn frame_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(FRAME_CONTENT_TYPE));
    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("ALLOWALL"));
    headers.insert(
        CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("frame-ancestors *"),
    );
    headers
}

/// Whether a declared content type survives the HTML override unharmed.
pub fn is_text_content(content_type: &str) -> bool {
    let ct = content_type.to_ascii_lowercase();
    ["text/", "application/xhtml", "+xml", "application/xml"]
        .iter()
        .any(|t| ct.contains(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(anonymous_mode: bool, fake_ip: bool) -> CheckRequest {
        CheckRequest::new("https://example.com")
            .unwrap()
            .anonymous_mode(anonymous_mode)
            .fake_ip(fake_ip)
    }

    fn header<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
        headers.get(name).and_then(|v| v.to_str().ok())
    }

    #[test]
    fn test_no_flags_sends_only_user_agent() {
        let headers = outbound_headers(&request(false, false));
        assert_eq!(header(&headers, &USER_AGENT), Some(DEFAULT_USER_AGENT));
        assert!(headers.get(&X_FORWARDED_FOR).is_none());
        assert!(headers.get(&X_REAL_IP).is_none());
    }

    #[test]
    fn test_custom_user_agent_replaces_default() {
        let req = request(false, false).user_agent(Some("peek-bot/1.0".to_string()));
        let headers = outbound_headers(&req);
        assert_eq!(header(&headers, &USER_AGENT), Some("peek-bot/1.0"));
    }

    #[test]
    fn test_anonymous_mode_uses_loopback() {
        let headers = outbound_headers(&request(true, false));
        assert_eq!(header(&headers, &X_FORWARDED_FOR), Some(LOOPBACK));
        assert_eq!(header(&headers, &X_REAL_IP), Some(LOOPBACK));
    }

    #[test]
    fn test_fake_ip_sets_parseable_forwarded_for() {
        let headers = outbound_headers(&request(false, true));
        let value = header(&headers, &X_FORWARDED_FOR).unwrap();
        assert!(value.parse::<Ipv4Addr>().is_ok());
        assert!(headers.get(&X_REAL_IP).is_none());
    }

    #[test]
    fn test_fake_ip_wins_over_anonymous_forwarded_for() {
        // A fresh draw can only equal loopback with probability 2^-32.
        let values: Vec<String> = (0..4)
            .map(|_| {
                let headers = outbound_headers(&request(true, true));
                assert_eq!(header(&headers, &X_REAL_IP), Some(LOOPBACK));
                header(&headers, &X_FORWARDED_FOR).unwrap().to_string()
            })
            .collect();
        assert!(values.iter().any(|v| v != LOOPBACK));
    }

    #[test]
    fn test_random_ipv4_varies_between_calls() {
        let first = random_ipv4();
        assert!((0..8).any(|_| random_ipv4() != first));
    }

    #[test]
    fn test_frame_headers_are_permissive() {
        let headers = frame_headers();
        assert_eq!(header(&headers, &CONTENT_TYPE), Some(FRAME_CONTENT_TYPE));
        assert_eq!(header(&headers, &X_FRAME_OPTIONS), Some("ALLOWALL"));
        assert_eq!(
            header(&headers, &CONTENT_SECURITY_POLICY),
            Some("frame-ancestors *")
        );
    }

    #[test]
    fn test_is_text_content() {
        assert!(is_text_content("text/html"));
        assert!(is_text_content("TEXT/PLAIN; charset=utf-8"));
        assert!(is_text_content("application/xhtml+xml"));
        assert!(!is_text_content("application/json"));
        assert!(!is_text_content("image/png"));
    }
}
