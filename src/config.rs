//! Configuration management

use crate::types::FetchBudget;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the API key when the config file has none
pub const API_KEY_ENV: &str = "YT_API_KEY";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub youtube: YouTubeConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct YouTubeConfig {
    /// Data API key
    pub api_key: String,
    /// Data API v3 endpoint
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Pause between page requests in milliseconds
    pub page_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Maximum non-spam comments collected per video
    pub max_fetch: usize,
    /// Maximum comments kept after ranking by likes
    pub max_return: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database path
    pub path: String,
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path
            .as_ref()
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Config path is not valid UTF-8"))?;

        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("COMMENT_SENTIMENT").separator("__"))
            .build()?;

        let mut config: Config = settings.try_deserialize()?;
        config.apply_env_key();
        Ok(config)
    }

    /// Load from default locations, falling back to defaults plus environment
    pub fn load_default() -> anyhow::Result<Self> {
        let paths = [
            "config.toml",
            "config.yaml",
            "~/.config/comment-sentiment/config.toml",
        ];

        for path in paths {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                return Self::load(expanded.as_ref());
            }
        }

        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix("COMMENT_SENTIMENT").separator("__"))
            .build()?;
        let mut config: Config = settings.try_deserialize()?;
        config.apply_env_key();
        Ok(config)
    }

    fn apply_env_key(&mut self) {
        if self.youtube.api_key.is_empty() {
            if let Ok(key) = std::env::var(API_KEY_ENV) {
                self.youtube.api_key = key;
            }
        }
    }
}

impl YouTubeConfig {
    pub fn page_delay(&self) -> Duration {
        // Never zero
        Duration::from_millis(self.page_delay_ms.max(1))
    }
}

impl FetchConfig {
    pub fn budget(&self) -> FetchBudget {
        FetchBudget::new(self.max_fetch, self.max_return)
    }
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            timeout_secs: 30,
            page_delay_ms: 100,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        let budget = FetchBudget::default();
        Self {
            max_fetch: budget.max_fetch,
            max_return: budget.max_return,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "comments.db".to_string(),
        }
    }
}
