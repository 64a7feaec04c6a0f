//! Infrastructure shared by the proxy and the probe.
//!
//! - Outbound HTTP client construction
//! - DNS resolution for probe reports

pub mod client;
pub mod dns;

pub use client::{build_client, reason_phrase, MAX_REDIRECTS};
pub use dns::{resolve_dns, DnsResolver, DnsResult, HickoryDnsResolver};
