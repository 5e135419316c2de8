use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_SPOONACULAR_BASE_URL: &str = "https://api.spoonacular.com";

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config::from_env()
});

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub spoonacular_api_key: Option<String>,
    pub spoonacular_base_url: String,
    pub cors_allowed_origins: Vec<String>,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Config {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. `from_env` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        let get_or_default = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Config {
            host: get_or_default("HOST", "0.0.0.0"),
            port: parse_or_default("PORT", lookup("PORT"), 8000),
            spoonacular_api_key: lookup("SPOONACULAR_API_KEY")
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            spoonacular_base_url: get_or_default(
                "SPOONACULAR_BASE_URL",
                DEFAULT_SPOONACULAR_BASE_URL,
            ),
            cors_allowed_origins: parse_origins(
                &lookup("CORS_ALLOWED_ORIGINS").unwrap_or_default(),
            ),
            request_timeout: Duration::from_secs(parse_or_default(
                "SPOONACULAR_TIMEOUT_SECS",
                lookup("SPOONACULAR_TIMEOUT_SECS"),
                10,
            )),
            connect_timeout: Duration::from_secs(parse_or_default(
                "SPOONACULAR_CONNECT_TIMEOUT_SECS",
                lookup("SPOONACULAR_CONNECT_TIMEOUT_SECS"),
                5,
            )),
        }
    }
}

/// Split a comma-separated origin list. Falls back to
/// [`DEFAULT_CORS_ORIGIN`] when the list has no usable entries.
pub fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if origins.is_empty() {
        vec![DEFAULT_CORS_ORIGIN.to_string()]
    } else {
        origins
    }
}

fn parse_or_default<T>(key: &str, value: Option<String>, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match value {
        Some(raw) if !raw.trim().is_empty() => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("invalid value {raw:?} for {key}, using default {default}");
            default
        }),
        _ => default,
    }
}
