//! Process configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::ClockTime;
use crate::schedule::ScheduleConfig;

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 30 * 60;

/// A variable was set to something unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value {value:?} for {var}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// `TRIP_LISTEN_ADDR`
    pub listen_addr: SocketAddr,
    /// `TRIP_DATA_DIR`: fixture JSON files
    pub data_dir: PathBuf,
    /// `TRIP_STATIC_DIR`: served under `/static`
    pub static_dir: PathBuf,
    /// `MAPS_API_KEY`: when unset the mock adapter is used
    pub maps_api_key: Option<String>,
    /// `TRIP_AUTO_SEARCH`: find routes as soon as both places are picked
    pub auto_search: bool,
    /// `TRIP_SESSION_IDLE_SECS`
    pub session_idle: Duration,
    /// `TRIP_INITIAL_TIME`, `TRIP_SLOT_COUNT`, `TRIP_SLOT_INTERVAL_MINS`
    pub schedule: ScheduleConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            data_dir: PathBuf::from("data"),
            static_dir: PathBuf::from("static"),
            maps_api_key: None,
            auto_search: false,
            session_idle: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
            schedule: ScheduleConfig::default(),
        }
    }
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults.
    ///
    /// Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let listen_addr = match get("TRIP_LISTEN_ADDR") {
            Some(v) => parse("TRIP_LISTEN_ADDR", &v)?,
            None => defaults.listen_addr,
        };

        let session_idle = match get("TRIP_SESSION_IDLE_SECS") {
            Some(v) => Duration::from_secs(parse("TRIP_SESSION_IDLE_SECS", &v)?),
            None => defaults.session_idle,
        };

        let mut schedule = defaults.schedule;
        if let Some(v) = get("TRIP_INITIAL_TIME") {
            let time = ClockTime::parse(&v).map_err(|e| ConfigError {
                var: "TRIP_INITIAL_TIME",
                value: v.clone(),
                reason: e.to_string(),
            })?;
            schedule = schedule.with_initial_time(time);
        }
        if let Some(v) = get("TRIP_SLOT_COUNT") {
            schedule = schedule.with_slot_count(parse("TRIP_SLOT_COUNT", &v)?);
        }
        if let Some(v) = get("TRIP_SLOT_INTERVAL_MINS") {
            schedule = schedule.with_interval(parse("TRIP_SLOT_INTERVAL_MINS", &v)?);
        }

        Ok(Self {
            listen_addr,
            data_dir: get("TRIP_DATA_DIR").map_or(defaults.data_dir, PathBuf::from),
            static_dir: get("TRIP_STATIC_DIR").map_or(defaults.static_dir, PathBuf::from),
            maps_api_key: get("MAPS_API_KEY"),
            auto_search: match get("TRIP_AUTO_SEARCH") {
                Some(v) => parse_bool("TRIP_AUTO_SEARCH", &v)?,
                None => defaults.auto_search,
            },
            session_idle,
            schedule,
        })
    }
}

fn parse<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError {
            var,
            value: value.to_string(),
            reason: "expected true or false".into(),
        }),
    }
}
