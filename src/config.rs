use std::time::Duration;

use anyhow::Context;

use crate::filters::FilterPreferences;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub tmdb_access_token: String,
    pub tmdb_base_url: String,
    pub tmdb_rps: u32,
    pub request_timeout: Duration,
    pub start_offline: bool,
    pub filters: FilterPreferences,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://reelshelf.db?mode=rwc".to_string());

        let tmdb_access_token = std::env::var("TMDB_ACCESS_TOKEN").unwrap_or_default();
        let tmdb_base_url = std::env::var("TMDB_BASE_URL")
            .unwrap_or_else(|_| "https://api.themoviedb.org/3".to_string());

        let tmdb_rps: u32 =
            std::env::var("TMDB_RPS").ok().and_then(|s| s.parse().ok()).unwrap_or(4);

        let timeout_secs: u64 =
            std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|s| s.parse().ok()).unwrap_or(30);

        let start_offline = env_flag("START_OFFLINE", false)?;

        let defaults = FilterPreferences::default();
        let filters = FilterPreferences {
            show_popular: env_flag("SHOW_POPULAR", defaults.show_popular)?,
            show_top_rated: env_flag("SHOW_TOP_RATED", defaults.show_top_rated)?,
            show_favorites: env_flag("SHOW_FAVORITES", defaults.show_favorites)?,
        };

        Ok(Self {
            database_url,
            tmdb_access_token,
            tmdb_base_url,
            tmdb_rps: tmdb_rps.max(1),
            request_timeout: Duration::from_secs(timeout_secs.max(1)),
            start_offline,
            filters,
        })
    }
}

fn env_flag(name: &str, default: bool) -> anyhow::Result<bool> {
    match std::env::var(name) {
        Ok(value) => parse_flag(&value).with_context(|| format!("{name}={value}")),
        Err(_) => Ok(default),
    }
}

fn parse_flag(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("expected a boolean, got {other:?}"),
    }
}
