#![allow(dead_code)]

use axum::{
    body::Body,
    http::{HeaderMap, Method, Request, Response, StatusCode},
    response::{IntoResponse, Redirect},
    routing::{any, get},
    Json, Router,
};
use serde_json::{json, Value};
use site_peek::{
    infra::build_client, router, AppState, Config, DirectProbe, HttpProxyService,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower::ServiceExt;

pub const PAGE_HTML: &str = "<html><body><h1>upstream page</h1></body></html>";
pub const CUSTOM_REASON: &str = "Gone Fishing";

async fn echo_headers(headers: HeaderMap) -> Json<Value> {
    let get = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);
    Json(json!({
        "xForwardedFor": get("x-forwarded-for"),
        "xRealIp": get("x-real-ip"),
        "userAgent": get("user-agent"),
    }))
}

/// Reflects what the origin saw back as response headers, so HEAD requests
/// can be inspected too.
async fn inspect(method: Method, headers: HeaderMap) -> impl IntoResponse {
    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    [
        ("x-seen-method", method.to_string()),
        ("x-seen-user-agent", user_agent),
    ]
}

/// 404 with a non-canonical reason phrase on the status line.
async fn custom_reason() -> impl IntoResponse {
    let mut response = (StatusCode::NOT_FOUND, "gone").into_response();
    response
        .extensions_mut()
        .insert(hyper::ext::ReasonPhrase::from_static(CUSTOM_REASON.as_bytes()));
    response
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(3)).await;
    "too late"
}

fn upstream_router() -> Router {
    Router::new()
        .route(
            "/page",
            get(|| async { ([("content-type", "text/html")], PAGE_HTML) }),
        )
        .route("/echo", get(echo_headers))
        .route("/inspect", any(inspect))
        .route("/fishing", get(custom_reason))
        .route("/missing", get(|| async { (StatusCode::NOT_FOUND, "nope") }))
        .route(
            "/broken",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response() }),
        )
        .route("/old", get(|| async { Redirect::temporary("/page") }))
        .route("/slow", get(slow))
        .route("/big", get(|| async { "a".repeat(4096) }))
}

/// Serves the fake origin on an ephemeral loopback port.
pub async fn spawn_upstream() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, upstream_router()).await.unwrap();
    });
    addr
}

/// A loopback address with nothing listening on it.
pub fn closed_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

pub fn test_config() -> Config {
    Config {
        proxy_timeout: Duration::from_millis(1500),
        probe_timeout: Duration::from_secs(2),
        max_body_bytes: 1024,
        ..Config::default()
    }
}

pub fn create_test_app(config: &Config) -> Router {
    let client = build_client(config.proxy_timeout).unwrap();
    let state = AppState {
        proxy: HttpProxyService::new(client, config.max_body_bytes).arc(),
        probe: Arc::new(DirectProbe::from_config(config).unwrap()),
    };
    router(state)
}

pub async fn get_uri(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

pub fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
