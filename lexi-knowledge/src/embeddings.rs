use serde::{Deserialize, Serialize};

use crate::errors::{KnowledgeError, KnowledgeResult};

/// Task mode for asymmetric embedding: documents are embedded at ingest
/// time, queries at search time, and the two use different projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskMode {
    Document,
    Query,
}

impl TaskMode {
    fn as_str(self) -> &'static str {
        match self {
            Self::Document => "RETRIEVAL_DOCUMENT",
            Self::Query => "RETRIEVAL_QUERY",
        }
    }
}

/// Text-to-vector capability of the embedding backend.
#[async_trait::async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str, mode: TaskMode) -> KnowledgeResult<Vec<f32>>;
}

/// Client for the Gemini embedContent API.
#[derive(Debug, Clone)]
pub struct EmbeddingClient {
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

impl EmbeddingClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: model.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl Embedder for EmbeddingClient {
    async fn embed(&self, text: &str, mode: TaskMode) -> KnowledgeResult<Vec<f32>> {
        let url = format!(
            "{}/models/{}:embedContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let body = EmbedRequest {
            content: EmbedContent {
                parts: vec![EmbedPart {
                    text: text.to_string(),
                }],
            },
            task_type: mode.as_str(),
        };

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(KnowledgeError::Embedding(format!(
                "embedding request failed: {status} {text}"
            )));
        }

        let payload: EmbedResponse = response.json().await?;
        let values = payload.embedding.map(|e| e.values).unwrap_or_default();
        if values.is_empty() {
            return Err(KnowledgeError::Embedding(
                "embedding response missing vector".to_string(),
            ));
        }

        Ok(values)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedRequest {
    content: EmbedContent,
    task_type: &'static str,
}

#[derive(Debug, Serialize)]
struct EmbedContent {
    parts: Vec<EmbedPart>,
}

#[derive(Debug, Serialize)]
struct EmbedPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: Option<EmbedVector>,
}

#[derive(Debug, Deserialize)]
struct EmbedVector {
    values: Vec<f32>,
}
