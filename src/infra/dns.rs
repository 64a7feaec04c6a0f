//! Host resolution for probe reports.
//!
//! The probe request itself resolves through reqwest; this lookup only feeds
//! the `serverIp` and `dns` fields shown next to the status.

use hickory_resolver::{config::*, TokioAsyncResolver};
use std::{
    net::IpAddr,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::OnceCell;

#[derive(Debug)]
pub struct DnsResult {
    pub ips: Vec<IpAddr>,
    /// Lookup time in milliseconds; zero for literal addresses.
    pub duration_ms: u64,
}

#[allow(async_fn_in_trait)]
pub trait DnsResolver: Send + Sync {
    async fn resolve(&self, host: &str) -> Result<DnsResult, String>;
}

static DNS_RESOLVER: OnceCell<Arc<TokioAsyncResolver>> = OnceCell::const_new();

async fn shared_resolver() -> Arc<TokioAsyncResolver> {
    DNS_RESOLVER
        .get_or_init(|| async {
            // Same nameservers as the probe request itself when available.
            let resolver = TokioAsyncResolver::tokio_from_system_conf().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "No system DNS config, using default resolvers");
                TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
            });
            Arc::new(resolver)
        })
        .await
        .clone()
}

/// Resolver backed by hickory, bounded by a lookup deadline.
#[derive(Debug, Clone)]
pub struct HickoryDnsResolver {
    deadline: Duration,
}

impl HickoryDnsResolver {
    pub fn new(deadline: Duration) -> Self {
        Self { deadline }
    }
}

impl DnsResolver for HickoryDnsResolver {
    async fn resolve(&self, host: &str) -> Result<DnsResult, String> {
        // Url::host_str keeps the brackets around IPv6 literals.
        let host = host.trim_start_matches('[').trim_end_matches(']');
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(DnsResult {
                ips: vec![ip],
                duration_ms: 0,
            });
        }

        let start = Instant::now();
        let resolver = shared_resolver().await;
        let lookup = tokio::time::timeout(self.deadline, resolver.lookup_ip(host))
            .await
            .map_err(|_| format!("DNS lookup for {} timed out", host))?
            .map_err(|e| format!("DNS lookup failed: {}", e))?;

        let ips: Vec<IpAddr> = lookup.iter().collect();
        if ips.is_empty() {
            return Err("DNS lookup returned no addresses".to_string());
        }
        Ok(DnsResult {
            ips,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

pub async fn resolve_dns(host: &str, deadline: Duration) -> Result<DnsResult, String> {
    HickoryDnsResolver::new(deadline).resolve(host).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_literal_ipv4_skips_lookup() {
        let result = resolve_dns("127.0.0.1", Duration::from_secs(1)).await.unwrap();
        assert_eq!(result.ips, vec!["127.0.0.1".parse::<IpAddr>().unwrap()]);
        assert_eq!(result.duration_ms, 0);
    }

    #[tokio::test]
    async fn test_bracketed_ipv6_literal() {
        let result = resolve_dns("[::1]", Duration::from_secs(1)).await.unwrap();
        assert_eq!(result.ips[0].to_string(), "::1");
    }
}
