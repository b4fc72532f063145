//! # Client Options
//!
//! Construction-time settings for [`SicapClient`](crate::portal::client::SicapClient).
//! Every field has a default, so an empty JSON object, an empty environment or
//! `ClientOptions::default()` all yield a working client.
//!
//! Recognised environment variables:
//!
//! | Variable | Field |
//! |---|---|
//! | `SICAP_SECURE` | `secure` |
//! | `SICAP_VERBOSE` | `verbose` |
//! | `SICAP_TIMEOUT_SECS` | `timeout.overall_secs` |
//! | `SICAP_CONNECT_TIMEOUT_SECS` | `timeout.connect_secs` |
//! | `SICAP_CPV_PATH` | `cpv_path` |

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SicapError};
use crate::portal::cpv::CpvSource;

pub const ENV_SECURE: &str = "SICAP_SECURE";
pub const ENV_VERBOSE: &str = "SICAP_VERBOSE";
pub const ENV_TIMEOUT: &str = "SICAP_TIMEOUT_SECS";
pub const ENV_CONNECT_TIMEOUT: &str = "SICAP_CONNECT_TIMEOUT_SECS";
pub const ENV_CPV_PATH: &str = "SICAP_CPV_PATH";

/// Session-wide timeouts, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Whole request, connect included.
    pub overall_secs: f64,
    /// Establishing the connection.
    pub connect_secs: f64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            overall_secs: 60.0,
            connect_secs: 10.0,
        }
    }
}

impl Timeouts {
    /// Saturates at `Duration::MAX` for values [`Timeouts::validate`] rejects.
    pub fn overall(&self) -> Duration {
        Duration::try_from_secs_f64(self.overall_secs).unwrap_or(Duration::MAX)
    }

    pub fn connect(&self) -> Duration {
        Duration::try_from_secs_f64(self.connect_secs).unwrap_or(Duration::MAX)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, secs) in [("overall", self.overall_secs), ("connect", self.connect_secs)] {
            if !secs.is_finite() || secs <= 0.0 {
                return Err(SicapError::Config(format!(
                    "{name} timeout must be a positive number of seconds, got {secs}"
                )));
            }
            Duration::try_from_secs_f64(secs).map_err(|e| {
                SicapError::Config(format!("{name} timeout of {secs} seconds: {e}"))
            })?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    /// `https` when true, plain `http` otherwise.
    pub secure: bool,
    /// `None` means [`Timeouts::default`].
    pub timeout: Option<Timeouts>,
    /// INFO-level diagnostics when true, errors only otherwise.
    pub verbose: bool,
    /// Alternative CPV table; the bundled one is used when unset.
    pub cpv_path: Option<PathBuf>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            secure: true,
            timeout: None,
            verbose: false,
            cpv_path: None,
        }
    }
}

impl ClientOptions {
    pub fn timeouts(&self) -> Timeouts {
        self.timeout.unwrap_or_default()
    }

    pub fn cpv_source(&self) -> CpvSource {
        match &self.cpv_path {
            Some(path) => CpvSource::File(path.clone()),
            None => CpvSource::Bundled,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.timeouts().validate()
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(raw)
            .map_err(|e| SicapError::Config(format!("client options: {e}")))?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Defaults overlaid with the `SICAP_*` process environment.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env()
    }

    /// Overlays the `SICAP_*` process environment on `self`.
    pub fn with_env(self) -> Result<Self> {
        self.with_vars(|key| std::env::var(key).ok())
    }

    /// Overlays variables obtained from `lookup` on `self`.
    pub fn with_vars<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_SECURE) {
            self.secure = parse_flag(ENV_SECURE, &v)?;
        }
        if let Some(v) = lookup(ENV_VERBOSE) {
            self.verbose = parse_flag(ENV_VERBOSE, &v)?;
        }
        if let Some(v) = lookup(ENV_TIMEOUT) {
            let mut t = self.timeouts();
            t.overall_secs = parse_secs(ENV_TIMEOUT, &v)?;
            self.timeout = Some(t);
        }
        if let Some(v) = lookup(ENV_CONNECT_TIMEOUT) {
            let mut t = self.timeouts();
            t.connect_secs = parse_secs(ENV_CONNECT_TIMEOUT, &v)?;
            self.timeout = Some(t);
        }
        if let Some(v) = lookup(ENV_CPV_PATH) {
            if !v.trim().is_empty() {
                self.cpv_path = Some(PathBuf::from(v.trim()));
            }
        }
        self.validate()?;
        Ok(self)
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(SicapError::Config(format!("{name}: expected a boolean, got {other:?}"))),
    }
}

fn parse_secs(name: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|e| SicapError::Config(format!("{name}: {e}")))
}
