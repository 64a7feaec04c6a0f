pub mod config;
pub mod error;
pub mod infra;
pub mod probe;
pub mod proxy;
pub mod routes;
pub mod settings;

pub use config::Config;
pub use error::ProxyError;
pub use probe::{DirectProbe, ProbeReport};
pub use proxy::{CheckRequest, HttpProxyService, ProxyResponse, ProxyService};
pub use routes::{router, AppState};
pub use settings::{DeviceMode, Settings, SettingsPatch};
