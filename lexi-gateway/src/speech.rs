//! Speech synthesis with a permanent audio cache.
//!
//! Requested text is normalized into a slug key; the blob store is checked
//! first and only a miss triggers a synthesis call. Synthesized audio is
//! wrapped in a WAV container and uploaded with upsert semantics, so two
//! concurrent requests for the same text race harmlessly (the content is a
//! deterministic function of the text).

use std::sync::Arc;

use tracing::info;

use lexi_knowledge::{BlobStore, KnowledgeError};

use crate::providers::provider::{Provider, ProviderError};
use crate::retry::RetryPolicy;
use crate::wav::{pcm_to_wav, sample_rate_from_mime};

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("speech quota exhausted: {0}")]
    RateLimited(String),
    #[error("speech synthesis produced no audio")]
    NoAudio,
    #[error("audio payload missing sample rate in mime type '{0}'")]
    MissingSampleRate(String),
    #[error("speech provider error: {0}")]
    Provider(ProviderError),
    #[error("audio cache error: {0}")]
    Storage(#[from] KnowledgeError),
}

/// Cache-then-synthesize pipeline for spoken audio.
pub struct SpeechPipeline {
    provider: Arc<dyn Provider>,
    store: Arc<dyn BlobStore>,
    voice: String,
    retry: RetryPolicy,
}

impl SpeechPipeline {
    pub fn new(
        provider: Arc<dyn Provider>,
        store: Arc<dyn BlobStore>,
        voice: impl Into<String>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            provider,
            store,
            voice: voice.into(),
            retry,
        }
    }

    /// Public URL of the cached (or freshly synthesized) audio for `text`.
    pub async fn synthesize(&self, text: &str) -> Result<String, SpeechError> {
        let key = cache_key(text);

        if self.store.exists(&key).await? {
            info!("audio cache hit for '{key}'");
            return Ok(self.store.public_url(&key));
        }

        info!("audio cache miss for '{key}', synthesizing");
        let prompt = format!("Speak the following word clearly: {text}");
        let payload = self
            .retry
            .run(
                || self.provider.synthesize(&prompt, &self.voice),
                ProviderError::is_rate_limited,
            )
            .await
            .map_err(|e| {
                if e.is_rate_limited() {
                    SpeechError::RateLimited(e.to_string())
                } else if matches!(e, ProviderError::NoContent) {
                    SpeechError::NoAudio
                } else {
                    SpeechError::Provider(e)
                }
            })?;

        let sample_rate = sample_rate_from_mime(&payload.mime_type)
            .ok_or_else(|| SpeechError::MissingSampleRate(payload.mime_type.clone()))?;
        let wav = pcm_to_wav(&payload.data, sample_rate);

        self.store.put(&key, wav, "audio/wav").await?;
        Ok(self.store.public_url(&key))
    }
}

/// Cache key for a piece of text: lowercase, every char outside `[a-z0-9]`
/// replaced by `_`, suffixed `.wav`. Non-ASCII letters collapse to `_`.
pub fn cache_key(text: &str) -> String {
    let slug: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{slug}.wav")
}
