use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub site: SiteConfig,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub content: ContentConfig,
    pub media: MediaConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    pub title: String,
    pub description: String,
    pub url: String,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContentConfig {
    #[serde(default = "default_posts_per_page")]
    pub posts_per_page: usize,
    #[serde(default = "default_excerpt_length")]
    pub excerpt_length: usize,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            posts_per_page: default_posts_per_page(),
            excerpt_length: default_excerpt_length(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaConfig {
    pub upload_dir: String,
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default = "default_session_days")]
    pub session_days: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_days: default_session_days(),
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_posts_per_page() -> usize {
    9
}

fn default_excerpt_length() -> usize {
    200
}

fn default_max_upload_mb() -> usize {
    10
}

fn default_session_days() -> i64 {
    7
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!(
                "Could not read config file '{}': {}. Are you in a Quill site directory?",
                path.display(),
                e
            )
        })?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.content.posts_per_page == 0 {
            anyhow::bail!("content.posts_per_page must be greater than 0");
        }
        if self.content.posts_per_page > 100 {
            anyhow::bail!("content.posts_per_page must be 100 or less");
        }
        if self.content.excerpt_length == 0 {
            anyhow::bail!("content.excerpt_length must be greater than 0");
        }
        if self.media.max_upload_mb == 0 || self.media.max_upload_mb > 50 {
            anyhow::bail!("media.max_upload_mb must be between 1 and 50");
        }
        if self.auth.session_days <= 0 {
            anyhow::bail!("auth.session_days must be positive");
        }
        Ok(())
    }
}
