use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of one direct probe, serialised for the checker UI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeReport {
    /// The URL that was probed, after normalisation.
    pub url: String,
    pub status: Option<u16>,
    pub status_text: String,
    /// Wall-clock time until response headers arrived, in milliseconds.
    pub load_time: Option<u64>,
    pub headers: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_url: Option<String>,
    pub redirected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns: Option<u64>,
    /// Transport failure message; set only when no response arrived.
    pub error: Option<String>,
}

impl ProbeReport {
    pub fn failed(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            error: Some(error.into()),
            ..Default::default()
        }
    }

    /// 2xx and 3xx count as reachable.
    pub fn is_success(&self) -> bool {
        matches!(self.status, Some(s) if (200..400).contains(&s))
    }

    pub fn is_error(&self) -> bool {
        matches!(self.status, Some(s) if !(200..400).contains(&s))
    }
}
