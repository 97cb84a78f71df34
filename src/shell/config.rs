// Process configuration, read from environment variables.
//
// Responsibilities
// - Parse and validate every HABITS_* variable once at startup.
// - Read through `ConfigEnv` so tests pass a map instead of touching the process env.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

pub const BIND_ADDR_ENV: &str = "HABITS_BIND_ADDR";
pub const USER_ID_ENV: &str = "HABITS_USER_ID";
pub const STORE_ENV: &str = "HABITS_STORE";
pub const STORE_URL_ENV: &str = "HABITS_STORE_URL";
pub const STORE_API_KEY_ENV: &str = "HABITS_STORE_API_KEY";
pub const ACCESS_TOKEN_ENV: &str = "HABITS_ACCESS_TOKEN";
pub const REQUEST_TIMEOUT_ENV: &str = "HABITS_REQUEST_TIMEOUT_SECS";
pub const TICK_ENV: &str = "HABITS_TICK_SECS";
pub const VAPID_PUBLIC_KEY_ENV: &str = "HABITS_VAPID_PUBLIC_KEY";
pub const COACH_ENV: &str = "HABITS_COACH";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
const DEFAULT_TICK_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

pub trait ConfigEnv {
    fn string(&self, name: &str) -> Option<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl ConfigEnv for ProcessEnv {
    fn string(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl ConfigEnv for HashMap<&str, &str> {
    fn string(&self, name: &str) -> Option<String> {
        self.get(name).map(|v| v.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub base_url: String,
    pub api_key: String,
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    Memory,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoachBackend {
    Scripted,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub user_id: String,
    pub store: Backend,
    pub coach: CoachBackend,
    pub remote: Option<RemoteConfig>,
    pub request_timeout: Duration,
    pub tick_interval: Duration,
    pub vapid_public_key: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(&ProcessEnv)
    }

    pub fn from_env_with(env: &impl ConfigEnv) -> Result<Self, ConfigError> {
        let non_blank = |name: &str| env.string(name).filter(|v| !v.trim().is_empty());

        let bind_raw = non_blank(BIND_ADDR_ENV).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse().map_err(|_| ConfigError::Invalid {
            name: BIND_ADDR_ENV,
            value: bind_raw.clone(),
        })?;

        let user_id = non_blank(USER_ID_ENV).ok_or(ConfigError::Missing(USER_ID_ENV))?;

        let store = match non_blank(STORE_ENV).as_deref() {
            None | Some("memory") => Backend::Memory,
            Some("rest") => Backend::Remote,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: STORE_ENV,
                    value: other.to_string(),
                });
            }
        };
        let coach = match non_blank(COACH_ENV).as_deref() {
            None | Some("scripted") => CoachBackend::Scripted,
            Some("rest") => CoachBackend::Remote,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: COACH_ENV,
                    value: other.to_string(),
                });
            }
        };

        let needs_remote = store == Backend::Remote || coach == CoachBackend::Remote;
        let remote = if needs_remote {
            Some(RemoteConfig {
                base_url: non_blank(STORE_URL_ENV).ok_or(ConfigError::Missing(STORE_URL_ENV))?,
                api_key: non_blank(STORE_API_KEY_ENV)
                    .ok_or(ConfigError::Missing(STORE_API_KEY_ENV))?,
                access_token: non_blank(ACCESS_TOKEN_ENV),
            })
        } else {
            None
        };

        Ok(Self {
            bind_addr,
            user_id,
            store,
            coach,
            remote,
            request_timeout: seconds(env, REQUEST_TIMEOUT_ENV, DEFAULT_REQUEST_TIMEOUT_SECS)?,
            tick_interval: seconds(env, TICK_ENV, DEFAULT_TICK_SECS)?,
            vapid_public_key: non_blank(VAPID_PUBLIC_KEY_ENV),
        })
    }
}

fn seconds(env: &impl ConfigEnv, name: &'static str, default: u64) -> Result<Duration, ConfigError> {
    match env.string(name) {
        None => Ok(Duration::from_secs(default)),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
            _ => Err(ConfigError::Invalid { name, value: raw }),
        },
    }
}
