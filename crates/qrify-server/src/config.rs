//! Server configuration.
//!
//! Sources, lowest precedence first: built-in defaults, a TOML file,
//! environment variables, then CLI flags (applied in `main`).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// The single origin allowed by CORS (credentials included).
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    /// Optional directory served for paths outside `/api`.
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Upper bound for the requested PNG width.
    #[serde(default = "default_max_png_size")]
    pub max_png_size: u32,
    /// Mark the session cookie `Secure; SameSite=None` for cross-site HTTPS frontends.
    #[serde(default)]
    pub secure_cookies: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_frontend_url() -> String {
    "http://localhost:5500".to_string()
}

fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("qrify")
        .join("history.db")
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_max_png_size() -> u32 {
    2048
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            frontend_url: default_frontend_url(),
            db_path: default_db_path(),
            static_dir: None,
            max_upload_bytes: default_max_upload_bytes(),
            max_png_size: default_max_png_size(),
            secure_cookies: false,
        }
    }
}

impl Config {
    /// Load config from a specific file path.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    /// Load config from default location (config/default.toml) or fall back to defaults.
    pub fn load() -> Result<Self> {
        let config_path = PathBuf::from("config/default.toml");
        if config_path.exists() {
            return Self::load_from(&config_path);
        }

        Ok(Config::default())
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("invalid PORT: {:?}", port))?;
        }
        if let Some(url) = lookup("FRONTEND_URL") {
            self.frontend_url = url;
        }
        if let Some(path) = lookup("QRIFY_DB_PATH") {
            self.db_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup("QRIFY_STATIC_DIR") {
            self.static_dir = Some(PathBuf::from(dir));
        }
        Ok(())
    }
}
