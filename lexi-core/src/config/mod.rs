//! Configuration management for lexi.
//!
//! This module provides a unified configuration system that separates
//! secrets (from environment variables) from settings (from TOML files).
//!
//! # Configuration Sources
//!
//! ## Secrets (Environment Variables)
//! - `GEMINI_API_KEY` - Gemini API key (generation, embedding, speech)
//! - `SUPABASE_URL` - Supabase project URL (similarity search + audio cache)
//! - `SUPABASE_SERVICE_KEY` - Supabase service-role key
//!
//! ## Settings (TOML File)
//! Located at `./lexi.toml` (or `LEXI_CONFIG`); see [`Settings`] for the
//! full schema and defaults.

mod secrets;
mod settings;

pub use secrets::{Secrets, SecretsError};
pub use settings::{
    GatewaySettings, ModelSettings, RetrievalSettings, Settings, SettingsError, SpeechSettings,
};

/// Combined configuration containing both secrets and settings.
///
/// This is the main configuration type used throughout the application.
/// It separates sensitive secrets (from env) from non-sensitive settings (from TOML).
#[derive(Debug, Clone)]
pub struct Config {
    /// Secrets loaded from environment variables
    pub secrets: Secrets,
    /// Settings loaded from TOML configuration file
    pub settings: Settings,
}

/// Errors that can occur when loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Secrets error: {0}")]
    Secrets(#[from] SecretsError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if any required secret is missing or the settings
    /// file cannot be read or parsed. Both abort startup: the service never
    /// runs with partial configuration.
    pub fn load() -> Result<Self, ConfigError> {
        let secrets = Secrets::from_env()?;
        let settings = Settings::load()?;
        Ok(Self { secrets, settings })
    }

    /// Get the HTTP bind address.
    pub fn bind_addr(&self) -> String {
        self.settings.bind_addr()
    }
}
