//! Secrets configuration loaded from environment variables only.
//!
//! This module handles sensitive configuration like API keys that should
//! never be stored in files. All secrets are read from environment variables.

use std::env;

/// Secrets loaded exclusively from environment variables.
///
/// Every field is required: a process missing any of them must abort at
/// startup rather than serve degraded behavior.
#[derive(Debug, Clone)]
pub struct Secrets {
    /// Gemini API key (env: GEMINI_API_KEY)
    pub gemini_api_key: String,

    /// Supabase project URL (env: SUPABASE_URL)
    pub supabase_url: String,

    /// Supabase service-role key (env: SUPABASE_SERVICE_KEY)
    pub supabase_service_key: String,
}

/// Errors that can occur when loading secrets
#[derive(Debug, thiserror::Error)]
pub enum SecretsError {
    #[error("Missing required secret: {0}")]
    MissingSecret(&'static str),
}

impl Secrets {
    /// Load secrets from environment variables.
    ///
    /// This function also loads .env file if present (for development),
    /// but production should rely on actual environment variables.
    pub fn from_env() -> Result<Self, SecretsError> {
        // Load .env file if present (development convenience)
        let _ = dotenvy::dotenv();

        Self::from_env_inner()
    }

    /// Internal method to load from environment without loading .env
    pub(crate) fn from_env_inner() -> Result<Self, SecretsError> {
        Ok(Self {
            gemini_api_key: require("GEMINI_API_KEY")?,
            supabase_url: require("SUPABASE_URL")?,
            supabase_service_key: require("SUPABASE_SERVICE_KEY")?,
        })
    }
}

fn require(name: &'static str) -> Result<String, SecretsError> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(SecretsError::MissingSecret(name))
}
