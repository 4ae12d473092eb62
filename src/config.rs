//! Runtime configuration from the environment.
//!
//! `.env` is loaded first (if present), then:
//!
//! | variable                   | default                            |
//! |----------------------------|------------------------------------|
//! | `FRED_API_KEY`             | none (or read from `FRED_API_KEY_FILE`) |
//! | `FRED_BASE_URL`            | `https://api.stlouisfed.org/fred`  |
//! | `FRED_TIMEOUT_SECS`        | 30                                 |
//! | `FRED_PAUSE_EVERY`         | 100                                |
//! | `FRED_PAUSE_SECS`          | 45                                 |
//! | `FRED_CATEGORY_PAUSE_SECS` | 5                                  |
//!
//! Unparseable numbers fall back to their defaults with a warning.

use std::env;
use std::fs;
use std::str::FromStr;
use std::time::Duration;

use crate::data::fred::DEFAULT_BASE_URL;
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
    /// Pause after this many pairs during an analysis run (0 disables).
    pub pause_every: usize,
    pub pause_secs: u64,
    /// Pause after each leaf/root during category descent.
    pub category_pause_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            pause_every: 100,
            pause_secs: 45,
            category_pause_secs: 5,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = get("FRED_API_KEY").or_else(|| get("FRED_API_KEY_FILE").and_then(|path| read_key_file(&path)));

        Self {
            api_key,
            base_url: get("FRED_BASE_URL").unwrap_or(defaults.base_url),
            timeout_secs: parse_or("FRED_TIMEOUT_SECS", get("FRED_TIMEOUT_SECS"), defaults.timeout_secs),
            pause_every: parse_or("FRED_PAUSE_EVERY", get("FRED_PAUSE_EVERY"), defaults.pause_every),
            pause_secs: parse_or("FRED_PAUSE_SECS", get("FRED_PAUSE_SECS"), defaults.pause_secs),
            category_pause_secs: parse_or(
                "FRED_CATEGORY_PAUSE_SECS",
                get("FRED_CATEGORY_PAUSE_SECS"),
                defaults.category_pause_secs,
            ),
        }
    }

    pub fn api_key(&self) -> Result<&str, AppError> {
        self.api_key.as_deref().ok_or_else(|| {
            AppError::input("Missing FRED API key. Set FRED_API_KEY (or FRED_API_KEY_FILE) in the environment or .env.")
        })
    }

    pub fn pause(&self) -> Duration {
        Duration::from_secs(self.pause_secs)
    }

    pub fn category_pause(&self) -> Duration {
        Duration::from_secs(self.category_pause_secs)
    }
}

fn read_key_file(path: &str) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(contents) => Some(contents.trim().to_string()).filter(|k| !k.is_empty()),
        Err(e) => {
            log::warn!("Could not read FRED_API_KEY_FILE '{path}': {e}");
            None
        }
    }
}

fn parse_or<T: FromStr + Copy + std::fmt::Display>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("{key}='{raw}' is not a valid number; using {default}");
            default
        }),
    }
}
