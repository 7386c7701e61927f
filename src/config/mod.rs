use std::env;
use std::fmt;
use std::path::PathBuf;
use anyhow::{Result, Context};
use tracing::{info, warn};

pub const DEFAULT_GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.1-8b-instant";

/// Process-wide settings, loaded once at startup and never mutated.
#[derive(Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub max_file_size_mb: usize,
    pub upload_dir: PathBuf,
    pub groq_api_key: Option<String>,
    pub groq_api_base: String,
    pub groq_model: String,
    pub temperature: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 8000,
            max_file_size_mb: 25,
            upload_dir: PathBuf::from("uploads"),
            groq_api_key: None,
            groq_api_base: DEFAULT_GROQ_API_BASE.to_string(),
            groq_model: DEFAULT_GROQ_MODEL.to_string(),
            temperature: 0.1,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("max_file_size_mb", &self.max_file_size_mb)
            .field("upload_dir", &self.upload_dir)
            .field("groq_api_key", &self.groq_api_key.as_ref().map(|_| "<redacted>"))
            .field("groq_api_base", &self.groq_api_base)
            .field("groq_model", &self.groq_model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let defaults = Config::default();

        let config = Config {
            server_host: Self::string_env_var("SERVER_HOST", &defaults.server_host),
            server_port: Self::parse_env_var("PORT", defaults.server_port)
                .context("Failed to parse PORT")?,
            max_file_size_mb: Self::parse_env_var("MAX_FILE_SIZE_MB", defaults.max_file_size_mb)
                .context("Failed to parse MAX_FILE_SIZE_MB")?,
            upload_dir: PathBuf::from(Self::string_env_var(
                "UPLOAD_DIR",
                &defaults.upload_dir.to_string_lossy(),
            )),
            groq_api_key: env::var("GROQ_API_KEY")
                .ok()
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            groq_api_base: Self::string_env_var("GROQ_API_BASE", &defaults.groq_api_base),
            groq_model: Self::string_env_var("GROQ_MODEL", &defaults.groq_model),
            temperature: Self::parse_env_var("GROQ_TEMPERATURE", defaults.temperature)
                .context("Failed to parse GROQ_TEMPERATURE")?,
        };

        config.validate()?;

        if config.groq_api_key.is_none() {
            warn!("No inference API key configured. Set GROQ_API_KEY environment variable.");
        }

        info!("Configuration loaded successfully: {:?}", config);
        Ok(config)
    }

    fn string_env_var(var_name: &str, default: &str) -> String {
        match env::var(var_name) {
            Ok(val) if !val.trim().is_empty() => val.trim().to_string(),
            _ => {
                info!("{} not set, using default: {}", var_name, default);
                default.to_string()
            }
        }
    }

    fn parse_env_var<T>(var_name: &str, default: T) -> Result<T>
    where
        T: std::str::FromStr + Copy + std::fmt::Debug,
        T::Err: std::fmt::Display,
    {
        match env::var(var_name) {
            Ok(val) => match val.trim().parse() {
                Ok(parsed) => Ok(parsed),
                Err(e) => {
                    warn!("Failed to parse {}: {} (using default: {:?})", var_name, e, default);
                    Ok(default)
                }
            },
            Err(_) => {
                info!("{} not set, using default: {:?}", var_name, default);
                Ok(default)
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.server_port == 0 {
            return Err(anyhow::anyhow!("PORT must be greater than 0"));
        }
        if self.max_file_size_mb == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }
        if self.groq_api_base.trim().is_empty() {
            return Err(anyhow::anyhow!("GROQ_API_BASE must not be empty"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(anyhow::anyhow!("GROQ_TEMPERATURE must be between 0.0 and 2.0"));
        }
        Ok(())
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
