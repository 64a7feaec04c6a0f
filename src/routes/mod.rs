pub mod check;
pub mod health;
pub mod proxy;
pub mod visit;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::probe::DirectProbe;
use crate::proxy::{HttpProxyService, ProxyService};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub proxy: Arc<dyn ProxyService>,
    pub probe: Arc<DirectProbe>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self {
            proxy: HttpProxyService::from_config(config)?.arc(),
            probe: Arc::new(DirectProbe::from_config(config)?),
        })
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health::health_check))
        .route("/proxy", get(proxy::proxy_page))
        .route("/api/proxy", get(proxy::proxy_page))
        .route("/api/check", get(check::check_url))
        .route("/api/visit", get(visit::visit_url))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
