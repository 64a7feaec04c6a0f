//! Direct status probe against the real origin.
//!
//! Independent of the proxy: no spoofed headers, and every HTTP status is a
//! valid answer. Only transport failures end up in `ProbeReport::error`.

pub mod report;

pub use report::ProbeReport;

use axum::http::header::USER_AGENT;
use reqwest::{Client, Response};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use url::Url;

use crate::config::Config;
use crate::error::error_chain;
use crate::infra::{build_client, reason_phrase, DnsResolver, HickoryDnsResolver};

#[derive(Clone)]
pub struct DirectProbe<R = HickoryDnsResolver> {
    client: Client,
    resolver: R,
}

impl DirectProbe {
    pub fn new(client: Client, dns_deadline: Duration) -> Self {
        Self::with_resolver(client, HickoryDnsResolver::new(dns_deadline))
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self::new(
            build_client(config.probe_timeout)?,
            config.probe_timeout,
        ))
    }
}

impl<R: DnsResolver> DirectProbe<R> {
    pub fn with_resolver(client: Client, resolver: R) -> Self {
        Self { client, resolver }
    }

    /// Sends a HEAD request to `url` and reports what came back.
    ///
    /// The host lookup runs alongside the request but is not part of
    /// `load_time`.
    pub async fn check(&self, url: &str, user_agent: Option<&str>) -> ProbeReport {
        let target = match Url::parse(url) {
            Ok(target) => target,
            Err(e) => return ProbeReport::failed(url, format!("Invalid URL: {}", e)),
        };

        let mut request = self.client.head(target.clone());
        if let Some(ua) = user_agent.filter(|ua| !ua.trim().is_empty()) {
            request = request.header(USER_AGENT, ua);
        }

        let host = target.host_str().unwrap_or_default().to_string();
        let timed_send = async {
            let start = Instant::now();
            let outcome = request.send().await;
            (outcome, start.elapsed().as_millis() as u64)
        };
        let ((outcome, load_time), dns) =
            tokio::join!(timed_send, self.resolver.resolve(&host));

        let mut report = match outcome {
            Ok(response) => report_from_response(url, &target, response, load_time),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Probe failed");
                ProbeReport::failed(url, error_chain(&e))
            }
        };

        match dns {
            Ok(result) => {
                report.server_ip = result.ips.first().map(|ip| ip.to_string());
                report.dns = Some(result.duration_ms);
            }
            Err(e) => tracing::debug!(host = %host, error = %e, "Probe DNS lookup failed"),
        }

        report
    }
}

fn report_from_response(
    url: &str,
    target: &Url,
    response: Response,
    load_time: u64,
) -> ProbeReport {
    let status = response.status();

    let mut headers: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in response.headers() {
        let value = String::from_utf8_lossy(value.as_bytes());
        match headers.get_mut(name.as_str()) {
            Some(existing) => {
                existing.push_str(", ");
                existing.push_str(&value);
            }
            None => {
                headers.insert(name.as_str().to_string(), value.into_owned());
            }
        }
    }

    let final_url = response.url();
    ProbeReport {
        url: url.to_string(),
        status: Some(status.as_u16()),
        status_text: reason_phrase(&response),
        load_time: Some(load_time),
        headers,
        final_url: Some(final_url.to_string()),
        redirected: final_url != target,
        server_ip: None,
        dns: None,
        error: None,
    }
}
