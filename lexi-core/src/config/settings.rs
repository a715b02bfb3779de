//! Settings configuration loaded from TOML files.
//!
//! Non-sensitive configuration lives in a TOML file next to the binary
//! (`lexi.toml`, overridable via the `LEXI_CONFIG` environment variable).
//! A missing file means built-in defaults; a malformed file is an error.
//!
//! ```toml
//! [gateway]
//! host = "127.0.0.1"
//! port = 8000
//!
//! [models]
//! generation = "gemini-2.5-flash"
//! tts = "gemini-2.5-flash-preview-tts"
//! embedding = "text-embedding-004"
//!
//! [retrieval]
//! match_threshold = 0.65
//! match_count = 1
//!
//! [speech]
//! voice = "Kore"
//! bucket = "audio_cache"
//! max_attempts = 2
//! retry_backoff_secs = 40
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Settings loaded from the TOML configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub gateway: GatewaySettings,
    pub models: ModelSettings,
    pub retrieval: RetrievalSettings,
    pub speech: SpeechSettings,
}

/// HTTP server bind configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySettings {
    pub host: String,
    pub port: u16,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Model identifiers for the three remote model roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Text generation model (classification, answers)
    pub generation: String,
    /// Speech synthesis model
    pub tts: String,
    /// Embedding model for similarity search
    pub embedding: String,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            generation: "gemini-2.5-flash".to_string(),
            tts: "gemini-2.5-flash-preview-tts".to_string(),
            embedding: "text-embedding-004".to_string(),
        }
    }
}

/// Similarity-search tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Minimum cosine similarity for a stored item to count as a match
    pub match_threshold: f32,
    /// Result cap per knowledge category
    pub match_count: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            match_threshold: 0.65,
            match_count: 1,
        }
    }
}

/// Speech synthesis and audio cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    /// Prebuilt voice identity for synthesis
    pub voice: String,
    /// Storage bucket holding cached audio
    pub bucket: String,
    /// Total synthesis attempts before giving up on quota errors
    pub max_attempts: u32,
    /// Fixed pause between synthesis attempts
    pub retry_backoff_secs: u64,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            voice: "Kore".to_string(),
            bucket: "audio_cache".to_string(),
            max_attempts: 2,
            retry_backoff_secs: 40,
        }
    }
}

/// Errors that can occur when loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl Settings {
    /// Load settings from `LEXI_CONFIG` or `./lexi.toml`.
    pub fn load() -> Result<Self, SettingsError> {
        let path = std::env::var("LEXI_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("lexi.toml"));
        Self::load_from(&path)
    }

    /// Load settings from an explicit path; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            tracing::debug!("no settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The HTTP bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.gateway.host, self.gateway.port)
    }
}
