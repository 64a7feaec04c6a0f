use std::env;
use std::time::Duration;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_PROXY_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Total wall-clock budget for one proxied fetch, body included.
    pub proxy_timeout: Duration,
    pub probe_timeout: Duration,
    /// Upstream bodies larger than this are rejected while streaming.
    pub max_body_bytes: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: parse_var("PORT").unwrap_or(DEFAULT_PORT),
            proxy_timeout: Duration::from_secs(
                parse_var("PROXY_TIMEOUT_SECS").unwrap_or(DEFAULT_PROXY_TIMEOUT_SECS),
            ),
            probe_timeout: Duration::from_secs(
                parse_var("PROBE_TIMEOUT_SECS").unwrap_or(DEFAULT_PROBE_TIMEOUT_SECS),
            ),
            max_body_bytes: parse_var("PROXY_MAX_BODY_BYTES").unwrap_or(DEFAULT_MAX_BODY_BYTES),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            proxy_timeout: Duration::from_secs(DEFAULT_PROXY_TIMEOUT_SECS),
            probe_timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
