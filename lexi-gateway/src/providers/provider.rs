//! Provider trait for abstracting the generation backend.

/// Raw audio returned by a speech-capable model.
#[derive(Debug, Clone)]
pub struct AudioPayload {
    /// Declared MIME type including codec parameters
    /// (e.g. `audio/L16;codec=pcm;rate=24000`).
    pub mime_type: String,
    /// Decoded raw sample bytes.
    pub data: Vec<u8>,
}

/// Provider error types
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("No content in response")]
    NoContent,
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),
}

impl ProviderError {
    /// Whether this error signals quota exhaustion or rate limiting.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Self::Api { status: 429, .. } => true,
            Self::Api { message, .. } => message.to_lowercase().contains("quota"),
            _ => false,
        }
    }
}

/// Capabilities of a generation backend.
#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    /// Provider name
    fn name(&self) -> &str;

    /// Current model
    fn model(&self) -> &str;

    /// Single-turn text generation.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Audio-only generation with a fixed voice identity.
    async fn synthesize(&self, prompt: &str, voice: &str) -> Result<AudioPayload, ProviderError>;
}
