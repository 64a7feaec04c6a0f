pub mod fetcher;
pub mod headers;
pub mod service;
pub mod types;

pub use fetcher::fetch_for_frame;
pub use headers::{frame_headers, outbound_headers, random_ipv4, DEFAULT_USER_AGENT};
pub use service::{HttpProxyService, ProxyFuture, ProxyService};
pub use types::*;
