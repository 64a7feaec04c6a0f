use serde::Deserialize;
use url::Url;

use crate::error::ProxyError;

/// Raw query string of `GET /proxy`.
///
/// Flags are kept as strings so that anything other than the literal `true`
/// reads as off instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyQuery {
    pub url: Option<String>,
    pub anonymous_mode: Option<String>,
    pub fake_ip: Option<String>,
    pub user_agent: Option<String>,
}

impl ProxyQuery {
    pub fn into_check_request(self) -> Result<CheckRequest, ProxyError> {
        let url = match self.url.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => return Err(ProxyError::url_required()),
        };

        Ok(CheckRequest::new(url)?
            .anonymous_mode(flag(self.anonymous_mode.as_deref()))
            .fake_ip(flag(self.fake_ip.as_deref()))
            .user_agent(self.user_agent))
    }
}

fn flag(value: Option<&str>) -> bool {
    value == Some("true")
}

/// A validated, per-call fetch request.
#[derive(Debug, Clone)]
pub struct CheckRequest {
    pub target_url: Url,
    pub anonymous_mode: bool,
    pub fake_ip: bool,
    pub user_agent: Option<String>,
}

impl CheckRequest {
    /// Parses `raw` strictly: it must be an absolute `http`/`https` URL with a
    /// host. Scheme-less input such as `example.com` is rejected.
    pub fn new(raw: &str) -> Result<Self, ProxyError> {
        Ok(Self {
            target_url: parse_target(raw)?,
            anonymous_mode: false,
            fake_ip: false,
            user_agent: None,
        })
    }

    pub fn anonymous_mode(mut self, enabled: bool) -> Self {
        self.anonymous_mode = enabled;
        self
    }

    pub fn fake_ip(mut self, enabled: bool) -> Self {
        self.fake_ip = enabled;
        self
    }

    /// Blank values are dropped so the default user-agent applies.
    pub fn user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent.filter(|ua| !ua.trim().is_empty());
        self
    }
}

pub fn parse_target(raw: &str) -> Result<Url, ProxyError> {
    let url = Url::parse(raw).map_err(|_| ProxyError::invalid_url())?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        _ => Err(ProxyError::invalid_url()),
    }
}

/// Upstream page as re-served to the embedding frame.
#[derive(Debug, Clone)]
pub struct ProxyResponse {
    pub body: String,
    /// Content type the upstream declared, before it is overwritten.
    pub declared_content_type: String,
    pub upstream_status: u16,
}
