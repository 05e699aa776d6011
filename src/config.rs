//! Configuration types, built from environment variables.

use std::str::FromStr;
use std::time::Duration;

use chrono::FixedOffset;
use secrecy::SecretString;

use crate::error::ConfigError;
use crate::flow::messages::DEFAULT_BOOKING_LINK;

/// Chat platform API settings.
#[derive(Debug, Clone)]
pub struct ChatwootConfig {
    /// Base URL without trailing slash, e.g. `https://app.chatwoot.com`.
    pub base_url: String,
    pub api_token: SecretString,
    pub account_id: String,
    /// Per-request timeout for outbound calls.
    pub timeout: Duration,
}

/// Business hours source for the final menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusinessHoursConfig {
    /// The team is always reachable.
    Always,
    Schedule {
        /// First open hour, local time.
        open_hour: u32,
        /// First closed hour, local time.
        close_hour: u32,
        utc_offset_minutes: i32,
        weekdays_only: bool,
    },
}

/// Top-level service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub port: u16,
    pub chatwoot: ChatwootConfig,
    pub booking_link: String,
    pub business_hours: BusinessHoursConfig,
}

impl AppConfig {
    /// Build config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| get(key).ok_or_else(|| ConfigError::MissingEnvVar(key.into()));

        let base_url = get("CHATWOOT_URL")
            .unwrap_or_else(|| "https://app.chatwoot.com".to_string())
            .trim_end_matches('/')
            .to_string();

        let chatwoot = ChatwootConfig {
            base_url,
            api_token: SecretString::from(require("CHATWOOT_API_TOKEN")?),
            account_id: require("CHATWOOT_ACCOUNT_ID")?,
            timeout: Duration::from_secs(parse_or(&get, "CHATWOOT_TIMEOUT_SECS", 10)?),
        };

        let business_hours = match get("BUSINESS_HOURS_MODE").as_deref() {
            None | Some("always") => BusinessHoursConfig::Always,
            Some("schedule") => {
                let open_hour = parse_or(&get, "BUSINESS_HOURS_START", 9)?;
                let close_hour = parse_or(&get, "BUSINESS_HOURS_END", 18)?;
                if open_hour > 24 || close_hour > 24 || open_hour >= close_hour {
                    return Err(ConfigError::InvalidValue {
                        key: "BUSINESS_HOURS_START".into(),
                        message: format!("need start < end within 0..=24, got {open_hour}..{close_hour}"),
                    });
                }
                let utc_offset_minutes = parse_or(&get, "BUSINESS_HOURS_UTC_OFFSET_MINUTES", 330)?;
                if FixedOffset::east_opt(utc_offset_minutes * 60).is_none() {
                    return Err(ConfigError::InvalidValue {
                        key: "BUSINESS_HOURS_UTC_OFFSET_MINUTES".into(),
                        message: format!("{utc_offset_minutes} is out of range"),
                    });
                }
                BusinessHoursConfig::Schedule {
                    open_hour,
                    close_hour,
                    utc_offset_minutes,
                    weekdays_only: parse_or(&get, "BUSINESS_HOURS_WEEKDAYS_ONLY", true)?,
                }
            }
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "BUSINESS_HOURS_MODE".into(),
                    message: format!("expected 'always' or 'schedule', got '{other}'"),
                });
            }
        };

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&get, "PORT", 8000)?,
            chatwoot,
            booking_link: get("BOOKING_LINK").unwrap_or_else(|| DEFAULT_BOOKING_LINK.to_string()),
            business_hours,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            }),
        None => Ok(default),
    }
}
