//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `blogforge.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "blogforge.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// AI provider settings.
    #[serde(default)]
    pub ai: AiConfig,

    /// Bootstrap administrator account.
    #[serde(default)]
    pub admin: AdminConfig,

    /// Uploaded file settings.
    #[serde(default)]
    pub uploads: UploadConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins. Empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("blog.db")
}

/// AI provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_ai_timeout")]
    pub timeout_seconds: u64,

    /// Providers in the order they are tried.
    #[serde(default = "default_providers")]
    pub providers: Vec<ProviderConfig>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_ai_timeout(),
            providers: default_providers(),
        }
    }
}

fn default_ai_timeout() -> u64 {
    60
}

/// One OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Display name used in logs and response messages.
    pub name: String,

    /// Base URL; `/chat/completions` is appended.
    pub base_url: String,

    /// Environment variable holding the API key. The provider is skipped
    /// when the variable is unset or empty.
    pub api_key_env: String,

    /// Model for text tasks.
    pub model: String,

    /// Model for image description. Vision tasks skip the provider if unset.
    #[serde(default)]
    pub vision_model: Option<String>,
}

fn default_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig {
            name: "Groq".to_string(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            model: "llama-3.1-8b-instant".to_string(),
            vision_model: Some("meta-llama/llama-4-scout-17b-16e-instruct".to_string()),
        },
        ProviderConfig {
            name: "OpenAI".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            vision_model: Some("gpt-4o".to_string()),
        },
    ]
}

/// Bootstrap administrator, created or reset at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// The only address allowed to register with the admin role.
    #[serde(default = "default_admin_email")]
    pub email: String,

    #[serde(default = "default_admin_name")]
    pub full_name: String,

    #[serde(default = "default_admin_password")]
    pub password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            email: default_admin_email(),
            full_name: default_admin_name(),
            password: default_admin_password(),
        }
    }
}

fn default_admin_email() -> String {
    "admin@blogforge.local".to_string()
}

fn default_admin_name() -> String {
    "Administrator".to_string()
}

fn default_admin_password() -> String {
    "change-me".to_string()
}

/// Uploaded file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Directory served under `/static`.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// Prefix for generated file URLs, e.g. `http://localhost:8000`.
    /// Empty produces host-relative URLs.
    #[serde(default)]
    pub public_base_url: String,

    /// Largest accepted avatar upload in bytes.
    #[serde(default = "default_max_avatar_bytes")]
    pub max_avatar_bytes: usize,

    /// Largest accepted request body for the image description tools,
    /// which carry base64 image data inline.
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            static_dir: default_static_dir(),
            public_base_url: String::new(),
            max_avatar_bytes: default_max_avatar_bytes(),
            max_image_bytes: default_max_image_bytes(),
        }
    }
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

fn default_max_avatar_bytes() -> usize {
    5 * 1024 * 1024 // 5MB
}

fn default_max_image_bytes() -> usize {
    20 * 1024 * 1024 // 20MB
}

impl UploadConfig {
    /// Directory holding avatar images.
    pub fn avatar_dir(&self) -> PathBuf {
        self.static_dir.join("avatars")
    }

    /// Public URL for an avatar file name.
    pub fn avatar_url(&self, file_name: &str) -> String {
        format!(
            "{}/static/avatars/{}",
            self.public_base_url.trim_end_matches('/'),
            file_name
        )
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only values given on the command line (or via their environment
    /// variables) override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref host) = args.host {
            self.server.host = host.clone();
        }
        if let Some(port) = args.port {
            self.server.port = port;
        }
        if let Some(ref path) = args.database {
            self.database.path = path.clone();
        }
        if let Some(ref dir) = args.static_dir {
            self.uploads.static_dir = dir.clone();
        }
        if let Some(ref password) = args.admin_password {
            self.admin.password = password.clone();
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}
