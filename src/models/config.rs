//! Configuration model loaded from external sources.

use std::env;

use chrono::NaiveTime;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::domain::attendance::AttendancePolicy;

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    pub secret: String,
    pub auth_service_url: String,
    pub assets_dir: String,
    #[serde(default)]
    pub attendance: AttendanceConfig,
}

impl ServerConfig {
    /// Reads `config/default.yaml`, the optional `config/{APP_ENV}.yaml`
    /// profile (`local` when unset) and `APP_*` environment variables, later
    /// sources winning.
    pub fn load() -> Result<Self, ConfigError> {
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

        Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{app_env}")).required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[derive(Clone, Debug, Deserialize)]
/// Working-hours settings applied to check-ins and check-outs.
pub struct AttendanceConfig {
    /// Check-ins after this time (`HH:MM:SS`) are late.
    pub late_after: NaiveTime,
    /// Days shorter than this are half days.
    pub half_day_minutes: i64,
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        let policy = AttendancePolicy::default();
        Self {
            late_after: policy.late_after,
            half_day_minutes: policy.half_day_minutes,
        }
    }
}

impl From<&AttendanceConfig> for AttendancePolicy {
    fn from(config: &AttendanceConfig) -> Self {
        Self {
            late_after: config.late_after,
            half_day_minutes: config.half_day_minutes,
        }
    }
}
