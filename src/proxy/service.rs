//! Proxy service abstraction layer.
//!
//! Routes talk to the fetcher through `ProxyService` so that a mock can stand
//! in for the network in tests.

use super::fetcher::fetch_for_frame;
use super::types::{CheckRequest, ProxyResponse};
use crate::config::Config;
use crate::error::ProxyError;
use crate::infra::build_client;
use reqwest::Client;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub type ProxyFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ProxyResponse, ProxyError>> + Send + 'a>>;

pub trait ProxyService: Send + Sync {
    /// Fetches the target once. Dropping the future cancels the request.
    fn fetch(&self, request: CheckRequest) -> ProxyFuture<'_>;
}

/// Default implementation over a shared reqwest client.
#[derive(Clone)]
pub struct HttpProxyService {
    client: Client,
    max_body_bytes: usize,
}

impl HttpProxyService {
    pub fn new(client: Client, max_body_bytes: usize) -> Self {
        Self {
            client,
            max_body_bytes,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self::new(
            build_client(config.proxy_timeout)?,
            config.max_body_bytes,
        ))
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl ProxyService for HttpProxyService {
    fn fetch(&self, request: CheckRequest) -> ProxyFuture<'_> {
        Box::pin(async move { fetch_for_frame(&self.client, &request, self.max_body_bytes).await })
    }
}
