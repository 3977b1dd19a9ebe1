//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    pub cors_origin: String,
    /// Base URL of the Ollama-style text-generation service.
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_temperature: f64,
    pub llm_num_predict: u32,
    pub llm_timeout_secs: u64,
    /// Base URL of the language/sentiment classifier service.
    pub classifier_url: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server and Database Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://auracare.db?mode=rwc".to_string());

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin = std::env::var("CORS_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        // --- Load External Service Settings ---
        let llm_base_url = std::env::var("LLM_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:11434".to_string());
        let llm_model = std::env::var("LLM_MODEL").unwrap_or_else(|_| "llama3".to_string());

        let llm_temperature_str =
            std::env::var("LLM_TEMPERATURE").unwrap_or_else(|_| "0.6".to_string());
        let llm_temperature = llm_temperature_str.parse::<f64>().map_err(|e| {
            ConfigError::InvalidValue("LLM_TEMPERATURE".to_string(), e.to_string())
        })?;

        let llm_num_predict_str =
            std::env::var("LLM_NUM_PREDICT").unwrap_or_else(|_| "150".to_string());
        let llm_num_predict = llm_num_predict_str.parse::<u32>().map_err(|e| {
            ConfigError::InvalidValue("LLM_NUM_PREDICT".to_string(), e.to_string())
        })?;

        let llm_timeout_secs_str =
            std::env::var("LLM_TIMEOUT_SECS").unwrap_or_else(|_| "100".to_string());
        let llm_timeout_secs = llm_timeout_secs_str.parse::<u64>().map_err(|e| {
            ConfigError::InvalidValue("LLM_TIMEOUT_SECS".to_string(), e.to_string())
        })?;

        let classifier_url = std::env::var("CLASSIFIER_URL")
            .unwrap_or_else(|_| "http://localhost:8500".to_string());

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            cors_origin,
            llm_base_url,
            llm_model,
            llm_temperature,
            llm_num_predict,
            llm_timeout_secs,
            classifier_url,
        })
    }
}
