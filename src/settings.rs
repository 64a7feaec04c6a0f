//! Checker settings and the URL helpers the viewer uses.
//!
//! `Settings` is a plain value. Callers read it when they build a request;
//! nothing here is process-global.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::time::Duration;
use thiserror::Error;
use url::form_urlencoded;

use crate::error::ProxyError;
use crate::proxy::CheckRequest;

pub const WIDTH_RANGE: RangeInclusive<u32> = 320..=1920;
pub const HEIGHT_RANGE: RangeInclusive<u32> = 480..=1440;
pub const DELAY_RANGE: RangeInclusive<u32> = 1..=60;

/// Path of the proxy endpoint the viewer frame points at.
pub const FRAME_PROXY_PATH: &str = "/api/proxy";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceMode {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub display_width: u32,
    pub display_height: u32,
    pub device_mode: DeviceMode,
    pub anonymous_mode: bool,
    pub fake_ip: bool,
    pub delay_mode: bool,
    pub delay_seconds: u32,
    pub dark_mode: bool,
    /// Empty means the default desktop user-agent.
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display_width: 1024,
            display_height: 768,
            device_mode: DeviceMode::Desktop,
            anonymous_mode: false,
            fake_ip: false,
            delay_mode: false,
            delay_seconds: 10,
            dark_mode: false,
            user_agent: String::new(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
}

/// Partial update; `None` fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub display_width: Option<u32>,
    pub display_height: Option<u32>,
    pub device_mode: Option<DeviceMode>,
    pub anonymous_mode: Option<bool>,
    pub fake_ip: Option<bool>,
    pub delay_mode: Option<bool>,
    pub delay_seconds: Option<u32>,
    pub dark_mode: Option<bool>,
    pub user_agent: Option<String>,
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        check_range("displayWidth", self.display_width, &WIDTH_RANGE)?;
        check_range("displayHeight", self.display_height, &HEIGHT_RANGE)?;
        check_range("delaySeconds", self.delay_seconds, &DELAY_RANGE)
    }

    pub fn clamped(mut self) -> Self {
        self.display_width = clamp(self.display_width, &WIDTH_RANGE);
        self.display_height = clamp(self.display_height, &HEIGHT_RANGE);
        self.delay_seconds = clamp(self.delay_seconds, &DELAY_RANGE);
        self
    }

    /// Last write wins for every field present in `patch`.
    pub fn apply(&mut self, patch: SettingsPatch) {
        let SettingsPatch {
            display_width,
            display_height,
            device_mode,
            anonymous_mode,
            fake_ip,
            delay_mode,
            delay_seconds,
            dark_mode,
            user_agent,
        } = patch;

        if let Some(v) = display_width {
            self.display_width = v;
        }
        if let Some(v) = display_height {
            self.display_height = v;
        }
        if let Some(v) = device_mode {
            self.device_mode = v;
        }
        if let Some(v) = anonymous_mode {
            self.anonymous_mode = v;
        }
        if let Some(v) = fake_ip {
            self.fake_ip = v;
        }
        if let Some(v) = delay_mode {
            self.delay_mode = v;
        }
        if let Some(v) = delay_seconds {
            self.delay_seconds = v;
        }
        if let Some(v) = dark_mode {
            self.dark_mode = v;
        }
        if let Some(v) = user_agent {
            self.user_agent = v;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Snapshot of the current privacy settings for one proxied fetch.
    pub fn check_request(&self, raw_url: &str) -> Result<CheckRequest, ProxyError> {
        Ok(CheckRequest::new(raw_url)?
            .anonymous_mode(self.anonymous_mode)
            .fake_ip(self.fake_ip)
            .user_agent(Some(self.user_agent.clone())))
    }

    /// Relative `src` for the viewer frame.
    pub fn frame_src(&self, url: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("url", url)
            .append_pair("anonymousMode", bool_str(self.anonymous_mode))
            .append_pair("fakeIp", bool_str(self.fake_ip))
            .finish();
        format!("{}?{}", FRAME_PROXY_PATH, query)
    }

    pub fn visit_delay(&self) -> Option<Duration> {
        self.delay_mode.then(|| clamp_delay(self.delay_seconds))
    }
}

/// Trims the input and prefixes `https://` when no http(s) scheme is given.
/// Returns `None` for blank input.
pub fn normalize_url(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if input.starts_with("http://") || input.starts_with("https://") {
        Some(input.to_string())
    } else {
        Some(format!("https://{}", input))
    }
}

pub fn clamp_delay(seconds: u32) -> Duration {
    Duration::from_secs(u64::from(clamp(seconds, &DELAY_RANGE)))
}

fn clamp(value: u32, range: &RangeInclusive<u32>) -> u32 {
    value.clamp(*range.start(), *range.end())
}

fn check_range(
    field: &'static str,
    value: u32,
    range: &RangeInclusive<u32>,
) -> Result<(), SettingsError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(SettingsError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
