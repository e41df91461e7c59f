use std::path::PathBuf;

use anyhow::{Context, Result};
use thiserror::Error;

pub const DEFAULT_API_VERSION: &str = "2024-10-01-preview";

const REQUIRED_VARS: [&str; 3] = [
    "AZURE_OPENAI_API_KEY",
    "AZURE_OPENAI_ENDPOINT",
    "AZURE_OPENAI_CHAT_COMPLETION_DEPLOYED_MODEL_NAME",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
}

/// Connection settings for the hosted assistant platform.
#[derive(Debug, Clone)]
pub struct AzureConfig {
    pub api_key: String,
    /// Trailing slash stripped.
    pub endpoint: String,
    pub deployment_name: String,
    pub api_version: String,
}

/// Application configuration loaded from environment variables.
/// Startup fails if any required variable is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub azure: AzureConfig,
    pub resumes_dir: PathBuf,
    pub jobs_dir: PathBuf,
    pub static_dir: PathBuf,
    pub seed_sample_resumes: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let missing: Vec<&'static str> = REQUIRED_VARS
            .iter()
            .copied()
            .filter(|key| get(*key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing).into());
        }

        let required = |key: &str| get(key).unwrap_or_default();

        Ok(Config {
            azure: AzureConfig {
                api_key: required("AZURE_OPENAI_API_KEY"),
                endpoint: required("AZURE_OPENAI_ENDPOINT")
                    .trim_end_matches('/')
                    .to_string(),
                deployment_name: required("AZURE_OPENAI_CHAT_COMPLETION_DEPLOYED_MODEL_NAME"),
                api_version: get("AZURE_OPENAI_API_VERSION")
                    .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            },
            resumes_dir: get("RESUMES_DIR")
                .unwrap_or_else(|| "resumes".to_string())
                .into(),
            jobs_dir: get("JOBS_DIR").unwrap_or_else(|| "jobs".to_string()).into(),
            static_dir: get("STATIC_DIR")
                .unwrap_or_else(|| "static".to_string())
                .into(),
            seed_sample_resumes: get("SEED_SAMPLE_RESUMES")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            port: get("PORT")
                .unwrap_or_else(|| "8000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
