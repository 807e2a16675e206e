use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";
pub const DEFAULT_ROOM_TTL_SECS: u64 = 24 * 60 * 60;
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:5173,http://localhost:5177";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} has an invalid value {value:?}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings the room coordinator needs at runtime
#[derive(Debug, Clone, PartialEq)]
pub struct RoomSettings {
    pub room_ttl: chrono::Duration,
    /// Reject moderator commands from participants that did not join as admin
    pub enforce_admin: bool,
}

impl Default for RoomSettings {
    fn default() -> Self {
        Self {
            room_ttl: chrono::Duration::seconds(DEFAULT_ROOM_TTL_SECS as i64),
            enforce_admin: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub room_ttl: Duration,
    pub sweep_interval: Duration,
    pub allowed_origins: Vec<String>,
    pub enforce_admin: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3001)),
            room_ttl: Duration::from_secs(DEFAULT_ROOM_TTL_SECS),
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
            allowed_origins: split_origins(DEFAULT_ALLOWED_ORIGINS),
            enforce_admin: true,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, falling back to defaults for unset keys
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("LIVEROOM_BIND_ADDR") {
            config.bind_addr = value.parse().map_err(|e: std::net::AddrParseError| {
                invalid("LIVEROOM_BIND_ADDR", &value, e.to_string())
            })?;
        }
        if let Some(value) = lookup("LIVEROOM_ROOM_TTL_SECS") {
            config.room_ttl = positive_secs("LIVEROOM_ROOM_TTL_SECS", &value)?;
        }
        if let Some(value) = lookup("LIVEROOM_SWEEP_INTERVAL_SECS") {
            config.sweep_interval = positive_secs("LIVEROOM_SWEEP_INTERVAL_SECS", &value)?;
        }
        if let Some(value) = lookup("LIVEROOM_ALLOWED_ORIGINS") {
            config.allowed_origins = split_origins(&value);
        }
        if let Some(value) = lookup("LIVEROOM_ENFORCE_ADMIN") {
            config.enforce_admin = value.trim().parse().map_err(|e: std::str::ParseBoolError| {
                invalid("LIVEROOM_ENFORCE_ADMIN", &value, e.to_string())
            })?;
        }

        Ok(config)
    }

    pub fn room_settings(&self) -> Result<RoomSettings, ConfigError> {
        let room_ttl = chrono::Duration::from_std(self.room_ttl).map_err(|e| {
            invalid(
                "LIVEROOM_ROOM_TTL_SECS",
                &self.room_ttl.as_secs().to_string(),
                e.to_string(),
            )
        })?;
        Ok(RoomSettings {
            room_ttl,
            enforce_admin: self.enforce_admin,
        })
    }
}

fn invalid(key: &'static str, value: &str, reason: String) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason,
    }
}

fn positive_secs(key: &'static str, value: &str) -> Result<Duration, ConfigError> {
    let secs: u64 = value
        .trim()
        .parse()
        .map_err(|e: std::num::ParseIntError| invalid(key, value, e.to_string()))?;
    if secs == 0 {
        return Err(invalid(key, value, "must be greater than zero".to_string()));
    }
    Ok(Duration::from_secs(secs))
}

fn split_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
