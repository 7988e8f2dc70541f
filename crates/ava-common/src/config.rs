//! ---
//! ava_section: "01-core-functionality"
//! ava_subsection: "module"
//! ava_type: "source"
//! ava_scope: "code"
//! ava_description: "Shared primitives and utilities for the uploader runtime."
//! ava_version: "v0.0.0-prealpha"
//! ava_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use tracing::debug;
use url::Url;

use crate::logging::LogFormat;

/// Ingest endpoint used when neither the config file nor the CLI names one.
pub const DEFAULT_ENDPOINT_URL: &str = "ws://ava-02.us-east-2.elasticbeanstalk.com/api/ws/send";

fn default_endpoint_url() -> String {
    DEFAULT_ENDPOINT_URL.to_owned()
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_reconnect_delay() -> Duration {
    Duration::from_secs(2)
}

fn default_bundle_interval() -> Duration {
    Duration::from_millis(100)
}

fn default_bundle_sensor_ids() -> Vec<u32> {
    vec![1, 2, 3, 192]
}

fn default_packet_interval() -> Duration {
    Duration::from_millis(50)
}

fn default_bench_interval() -> Duration {
    Duration::from_millis(100)
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

fn default_log_filter() -> String {
    "info".to_owned()
}

/// Primary configuration object for the uploader.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub reconnect: ReconnectConfig,
    #[serde(default)]
    pub bundle: BundleConfig,
    #[serde(default)]
    pub packet: PacketConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Metadata describing where an [`AppConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedAppConfig {
    pub config: AppConfig,
    /// `None` when no file was supplied and built-in defaults are in effect.
    pub source: Option<PathBuf>,
}

impl AppConfig {
    pub const ENV_CONFIG_PATH: &str = "AVA_CONFIG";

    /// Load configuration, preferring an explicit path, then `AVA_CONFIG`,
    /// then the built-in defaults. A config file is never required.
    pub fn load(explicit: Option<&Path>) -> Result<LoadedAppConfig> {
        if let Some(path) = explicit {
            return Ok(LoadedAppConfig {
                config: Self::from_path(path)?,
                source: Some(path.to_path_buf()),
            });
        }

        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(&path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: Some(path),
                });
            }
        }

        let config = Self::default();
        config.validate()?;
        Ok(LoadedAppConfig {
            config,
            source: None,
        })
    }

    fn from_path(path: &Path) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        contents
            .parse::<AppConfig>()
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Replace the endpoint URL, re-validating the result.
    pub fn override_url(&mut self, url: &str) -> Result<()> {
        self.endpoint.url = url.trim().to_owned();
        self.endpoint.validate()
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        self.endpoint.validate()?;
        if self.reconnect.delay.is_zero() {
            return Err(anyhow!("reconnect.delay_ms must be greater than zero"));
        }
        self.bundle.validate()?;
        self.packet.validate()?;
        Ok(())
    }
}

impl std::str::FromStr for AppConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: AppConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_endpoint_url")]
    pub url: String,
    #[serde(rename = "connect_timeout_ms", default = "default_connect_timeout")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub connect_timeout: Duration,
}

impl EndpointConfig {
    pub fn validate(&self) -> Result<()> {
        let parsed = Url::parse(&self.url)
            .with_context(|| format!("endpoint url '{}' is not a valid URL", self.url))?;
        match parsed.scheme() {
            "ws" | "wss" => {}
            other => {
                return Err(anyhow!(
                    "endpoint url must use ws:// or wss://, found '{}://'",
                    other
                ))
            }
        }
        if parsed.host_str().is_none() {
            return Err(anyhow!("endpoint url '{}' has no host", self.url));
        }
        if self.connect_timeout.is_zero() {
            return Err(anyhow!("endpoint.connect_timeout_ms must be greater than zero"));
        }
        Ok(())
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: default_endpoint_url(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconnectConfig {
    #[serde(rename = "delay_ms", default = "default_reconnect_delay")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub delay: Duration,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            delay: default_reconnect_delay(),
        }
    }
}

/// Settings for the JSON bundle variant.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleConfig {
    #[serde(rename = "interval_ms", default = "default_bundle_interval")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub interval: Duration,
    /// Sensor ids for throttle 1, throttle 2, brake and torque, in that order.
    #[serde(default = "default_bundle_sensor_ids")]
    pub sensor_ids: Vec<u32>,
}

impl BundleConfig {
    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(anyhow!("bundle.interval_ms must be greater than zero"));
        }
        if self.sensor_ids.len() != 4 {
            return Err(anyhow!(
                "bundle.sensor_ids must list exactly 4 ids, found {}",
                self.sensor_ids.len()
            ));
        }
        Ok(())
    }
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            interval: default_bundle_interval(),
            sensor_ids: default_bundle_sensor_ids(),
        }
    }
}

/// Settings for the binary packet variants.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacketConfig {
    #[serde(rename = "interval_ms", default = "default_packet_interval")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub interval: Duration,
    #[serde(rename = "bench_interval_ms", default = "default_bench_interval")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub bench_interval: Duration,
}

impl PacketConfig {
    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() || self.bench_interval.is_zero() {
            return Err(anyhow!("packet intervals must be greater than zero"));
        }
        Ok(())
    }
}

impl Default for PacketConfig {
    fn default() -> Self {
        Self {
            interval: default_packet_interval(),
            bench_interval: default_bench_interval(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SimulationConfig {
    /// Fixed RNG seed; when absent every run draws fresh entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
            filter: default_log_filter(),
        }
    }
}
