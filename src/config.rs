//! Wallboard configuration.
//!
//! Settings are resolved once at startup from an optional config file
//! overlaid by `WALLBOARD_*` environment variables. Keys are flat so the
//! same names work in both places:
//!
//! ```toml
//! instance_id = "d1c3d9b5-0000-0000-0000-000000000000"
//! region = "us-west-2"
//! access_key_id = "AKIA..."
//! secret_access_key = "..."
//! update_frequency = 15
//! outdated_threshold = 15
//!
//! quadrant_1_metric_display = "CONTACTS_IN_QUEUE"
//! quadrant_1_metric_desc = "Contacts waiting"
//! quadrant_1_green = "CONTACTS_IN_QUEUE < 5"
//! quadrant_1_yellow = "CONTACTS_IN_QUEUE < 10"
//! quadrant_1_red = "CONTACTS_IN_QUEUE >= 10"
//! ```
//!
//! The equivalent environment variable for `quadrant_1_green` is
//! `WALLBOARD_QUADRANT_1_GREEN`.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};

use crate::data::QuadrantConfig;
use crate::error::ConfigError;

/// Prefix for environment variables.
pub const ENV_PREFIX: &str = "WALLBOARD";

/// Default refresh interval and staleness threshold, in seconds.
pub const DEFAULT_UPDATE_FREQUENCY_SECS: u64 = 15;
pub const DEFAULT_OUTDATED_THRESHOLD_SECS: u64 = 15;

/// Number of quadrants shown when `quadrant_count` is not set.
pub const DEFAULT_QUADRANT_COUNT: usize = 4;

const REQUIRED_KEYS: &[&str] = &["instance_id", "access_key_id", "secret_access_key", "region"];

/// AWS credentials used to sign provider requests.
#[derive(Clone)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl Credentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }
}

// Keep secrets out of logs and panics.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Immutable wallboard settings.
#[derive(Debug, Clone)]
pub struct WallboardConfig {
    pub instance_id: String,
    pub region: String,
    pub credentials: Credentials,
    /// Overrides `https://connect.{region}.amazonaws.com`.
    pub endpoint: Option<String>,
    /// Delay between the end of one refresh cycle and the start of the next.
    pub update_frequency: Duration,
    /// Maximum snapshot age before the header is flagged as outdated.
    pub outdated_threshold: Duration,
    /// Request per-queue grouping from the metrics API.
    pub group_by_queue: bool,
    pub queue_types: Vec<String>,
    pub quadrants: Vec<QuadrantConfig>,
}

impl WallboardConfig {
    /// Load from an optional file plus the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, None)
    }

    /// Load with an explicit environment map instead of the process
    /// environment. Keys are full variable names (`WALLBOARD_REGION`).
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("update_frequency", DEFAULT_UPDATE_FREQUENCY_SECS as i64)?
            .set_default("outdated_threshold", DEFAULT_OUTDATED_THRESHOLD_SECS as i64)?
            .set_default("quadrant_count", DEFAULT_QUADRANT_COUNT as i64)?
            .set_default("group_by_queue", false)?
            .set_default("queue_types", "STANDARD")?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let config = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).source(env))
            .build()?;

        Self::from_config(&config)
    }

    /// Resolve settings from an already-built [`Config`].
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let get = |key: &str| -> Option<String> {
            config
                .get_string(key)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let missing: Vec<String> = REQUIRED_KEYS
            .iter()
            .filter(|&&key| get(key).is_none())
            .map(|key| key.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let update_frequency = positive_secs(config, "update_frequency")?;
        let outdated_threshold = positive_secs(config, "outdated_threshold")?;

        let quadrant_count = config.get_int("quadrant_count")?;
        if quadrant_count < 1 {
            return Err(ConfigError::Invalid {
                key: "quadrant_count".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let quadrants = (1..=quadrant_count)
            .map(|i| {
                let field = |suffix: &str| {
                    config.get_string(&format!("quadrant_{i}_{suffix}")).unwrap_or_default()
                };
                QuadrantConfig {
                    display: field("metric_display"),
                    description: field("metric_desc"),
                    green: field("green"),
                    yellow: field("yellow"),
                    red: field("red"),
                }
            })
            .collect();

        let queue_types = get("queue_types")
            .unwrap_or_default()
            .split(',')
            .map(|t| t.trim().to_uppercase())
            .filter(|t| !t.is_empty())
            .collect();

        Ok(Self {
            instance_id: get("instance_id").unwrap_or_default(),
            region: get("region").unwrap_or_default(),
            credentials: Credentials {
                access_key_id: get("access_key_id").unwrap_or_default(),
                secret_access_key: get("secret_access_key").unwrap_or_default(),
                session_token: get("session_token"),
            },
            endpoint: get("endpoint"),
            update_frequency,
            outdated_threshold,
            group_by_queue: config.get_bool("group_by_queue")?,
            queue_types,
            quadrants,
        })
    }
}

fn positive_secs(config: &Config, key: &str) -> Result<Duration, ConfigError> {
    let secs = config.get_int(key)?;
    if secs <= 0 {
        return Err(ConfigError::Invalid {
            key: key.to_string(),
            reason: format!("must be a positive number of seconds, got {secs}"),
        });
    }
    Ok(Duration::from_secs(secs as u64))
}
