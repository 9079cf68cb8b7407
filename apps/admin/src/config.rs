use anyhow::{bail, Context, Result};

use crate::api_client::DecodePolicy;

pub const DEFAULT_API_BASE_URL: &str = "https://ziva-health.netlify.app";
pub const DEFAULT_USER_DIRECTORY_PATH: &str = "/api/v1/user/profiles";
pub const DEFAULT_PROFILE_PATH: &str = "/api/v1/auth/profile";

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub port: u16,
    pub rust_log: String,
    pub http_timeout_secs: u64,
    pub decode_policy: DecodePolicy,
    pub user_directory_path: String,
    pub profile_path: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_base_url: optional_env("API_BASE_URL", DEFAULT_API_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            port: optional_env("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
            http_timeout_secs: optional_env("HTTP_TIMEOUT_SECS", "30")
                .parse::<u64>()
                .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
            decode_policy: parse_decode_policy(&optional_env("DECODE_POLICY", "lenient"))?,
            user_directory_path: optional_env("USER_DIRECTORY_PATH", DEFAULT_USER_DIRECTORY_PATH),
            profile_path: optional_env("PROFILE_PATH", DEFAULT_PROFILE_PATH),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            port: 8080,
            rust_log: "info".to_string(),
            http_timeout_secs: 30,
            decode_policy: DecodePolicy::Lenient,
            user_directory_path: DEFAULT_USER_DIRECTORY_PATH.to_string(),
            profile_path: DEFAULT_PROFILE_PATH.to_string(),
        }
    }
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_decode_policy(raw: &str) -> Result<DecodePolicy> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "lenient" => Ok(DecodePolicy::Lenient),
        "strict" => Ok(DecodePolicy::Strict),
        other => bail!("DECODE_POLICY must be 'lenient' or 'strict', got '{other}'"),
    }
}
