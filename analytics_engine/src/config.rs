use chirp_models::error::{AnalyticsError, Result};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api_base_url: String,
    pub api_bearer_token: String,
    pub search_limit: usize,
    pub timeline_limit: usize,
    pub max_connections: usize,
    pub include_friends: bool,
    pub min_frequency: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Config {
            api_base_url: env::var("API_BASE_URL")?,
            api_bearer_token: env::var("API_BEARER_TOKEN")?,
            search_limit: env::var("SEARCH_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            timeline_limit: env::var("TIMELINE_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            max_connections: env::var("MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            include_friends: env::var("INCLUDE_FRIENDS")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            min_frequency: env::var("MIN_FREQUENCY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
        })
    }

    pub fn validate(self) -> Result<Self> {
        macro_rules! ensure {
            ($cond:expr, $msg:literal) => {
                if !$cond {
                    return Err(AnalyticsError::Config($msg.into()));
                }
            };
        }

        ensure!(!self.api_base_url.is_empty(), "api_base_url missing");
        ensure!(
            self.api_base_url.starts_with("http"),
            "api_base_url must be an http(s) URL"
        );
        ensure!(!self.api_bearer_token.is_empty(), "api_bearer_token missing");
        ensure!(self.search_limit > 0, "search_limit must be > 0");
        ensure!(self.timeline_limit > 0, "timeline_limit must be > 0");
        ensure!(
            self.timeline_limit <= 200,
            "timeline_limit above the per-page API maximum"
        );
        ensure!(self.max_connections > 0, "max_connections must be > 0");

        Ok(self)
    }
}

use once_cell::sync::OnceCell;

static CONFIG_CELL: OnceCell<Config> = OnceCell::new();

pub fn get_config() -> Result<&'static Config> {
    CONFIG_CELL.get_or_try_init(|| {
        Config::from_env()
            .map_err(|e| AnalyticsError::Config(format!("Environment variable error: {}", e)))
            .and_then(|config| config.validate())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            api_base_url: "https://api.example.com/1.1".to_string(),
            api_bearer_token: "token".to_string(),
            search_limit: 100,
            timeline_limit: 100,
            max_connections: 100,
            include_friends: false,
            min_frequency: 3,
        }
    }

    #[test]
    fn accepts_sane_config() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn rejects_zero_limits() {
        let mut config = base_config();
        config.search_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_non_http_base_url() {
        let mut config = base_config();
        config.api_base_url = "redis://nope".to_string();
        assert!(config.validate().is_err());
    }
}
