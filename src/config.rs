use std::{str::FromStr, time::Duration};

use thiserror::Error;
use url::Url;

use crate::services::geocoding_service::CityCheckPolicy;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 5000;
const MONGODB_DATABASE: &str = "itinerary_planner";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1/";
const OPENAI_MODEL: &str = "gpt-4.1-mini";
const GEOCODING_BASE_URL: &str = "https://nominatim.openstreetmap.org/";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreBackend::Mongo),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unsupported store backend: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store_backend: StoreBackend,
    pub mongodb_uri: Option<String>,
    pub mongodb_database: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_base_url: Url,
    pub geocoding_base_url: Url,
    pub geocoding_user_agent: String,
    pub city_check_policy: CityCheckPolicy,
    pub verify_generated: bool,
    pub outbound_timeout: Option<Duration>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any name → value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let store_backend = parse_or(&var, "ITINERARY_STORE", StoreBackend::Mongo)?;
        let mongodb_uri = var("MONGODB_URI");
        if store_backend == StoreBackend::Mongo && mongodb_uri.is_none() {
            return Err(ConfigError::Missing("MONGODB_URI"));
        }

        let outbound_timeout = match var("OUTBOUND_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(parse_value(
                "OUTBOUND_TIMEOUT_SECS",
                &raw,
            )?)),
            None => None,
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| HOST.to_string()),
            port: parse_or(&var, "PORT", PORT)?,
            store_backend,
            mongodb_uri,
            mongodb_database: var("MONGODB_DATABASE")
                .unwrap_or_else(|| MONGODB_DATABASE.to_string()),
            openai_api_key: var("OPENAI_API_KEY").ok_or(ConfigError::Missing("OPENAI_API_KEY"))?,
            openai_model: var("OPENAI_MODEL").unwrap_or_else(|| OPENAI_MODEL.to_string()),
            openai_base_url: base_url(&var, "OPENAI_BASE_URL", OPENAI_BASE_URL)?,
            geocoding_base_url: base_url(&var, "GEOCODING_BASE_URL", GEOCODING_BASE_URL)?,
            geocoding_user_agent: var("GEOCODING_USER_AGENT").unwrap_or_else(|| {
                format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
            }),
            city_check_policy: parse_or(&var, "CITY_CHECK_POLICY", CityCheckPolicy::FailClosed)?,
            verify_generated: parse_or(&var, "VERIFY_GENERATED_ITINERARY", true)?,
            outbound_timeout,
        })
    }
}

fn parse_value<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    raw.trim().parse::<T>().map_err(|err| ConfigError::Invalid {
        name,
        value: raw.to_string(),
        reason: err.to_string(),
    })
}

fn parse_or<T, V>(var: &V, name: &'static str, default: T) -> Result<T, ConfigError>
where
    V: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: ToString,
{
    match var(name) {
        Some(raw) => parse_value(name, &raw),
        None => Ok(default),
    }
}

// Relative joins drop the last path segment unless it ends in a slash.
fn base_url<V>(var: &V, name: &'static str, default: &str) -> Result<Url, ConfigError>
where
    V: Fn(&str) -> Option<String>,
{
    let mut raw = var(name).unwrap_or_else(|| default.to_string());
    if !raw.ends_with('/') {
        raw.push('/');
    }
    Url::parse(&raw).map_err(|err| ConfigError::Invalid {
        name,
        value: raw,
        reason: err.to_string(),
    })
}
