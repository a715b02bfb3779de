//! Supabase similarity-search client.
//!
//! Each knowledge category is backed by a Postgres function
//! (`match_<category>`) that takes a query embedding, a similarity
//! threshold, and a result cap, and returns the nearest stored rows.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::errors::{KnowledgeError, KnowledgeResult};
use crate::models::{
    Category, CommonMistakeEntry, ConversationEntry, GrammarRuleEntry, IdiomEntry, VocabularyEntry,
};

/// Per-category nearest-neighbor lookups against the knowledge store.
#[async_trait::async_trait]
pub trait SimilaritySearch: Send + Sync {
    async fn match_vocabulary(
        &self,
        embedding: &[f32],
        threshold: f32,
        limit: usize,
    ) -> KnowledgeResult<Vec<VocabularyEntry>>;

    async fn match_grammar(
        &self,
        embedding: &[f32],
        threshold: f32,
        limit: usize,
    ) -> KnowledgeResult<Vec<GrammarRuleEntry>>;

    async fn match_idioms(
        &self,
        embedding: &[f32],
        threshold: f32,
        limit: usize,
    ) -> KnowledgeResult<Vec<IdiomEntry>>;

    async fn match_common_mistakes(
        &self,
        embedding: &[f32],
        threshold: f32,
        limit: usize,
    ) -> KnowledgeResult<Vec<CommonMistakeEntry>>;

    async fn match_conversations(
        &self,
        embedding: &[f32],
        threshold: f32,
        limit: usize,
    ) -> KnowledgeResult<Vec<ConversationEntry>>;
}

/// Supabase REST client for the `match_*` RPC functions.
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    client: reqwest::Client,
    base_url: String,
}

impl SupabaseStore {
    pub fn new(base_url: impl Into<String>, service_key: &str) -> KnowledgeResult<Self> {
        let client = reqwest::Client::builder()
            .default_headers(auth_headers(service_key)?)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn rpc<T: DeserializeOwned>(
        &self,
        category: Category,
        embedding: &[f32],
        threshold: f32,
        limit: usize,
    ) -> KnowledgeResult<Vec<T>> {
        let function = category.rpc_function();
        let url = format!("{}/rest/v1/rpc/{}", self.base_url, function);
        let body = MatchParams {
            query_embedding: embedding,
            match_threshold: threshold,
            match_count: limit,
        };

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(KnowledgeError::Rpc {
                function,
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

/// Default headers shared by every Supabase request.
pub(crate) fn auth_headers(service_key: &str) -> KnowledgeResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        "apikey",
        HeaderValue::from_str(service_key).map_err(|_| KnowledgeError::InvalidCredential)?,
    );
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {service_key}"))
            .map_err(|_| KnowledgeError::InvalidCredential)?,
    );
    Ok(headers)
}

#[derive(Debug, Serialize)]
struct MatchParams<'a> {
    query_embedding: &'a [f32],
    match_threshold: f32,
    match_count: usize,
}

#[async_trait::async_trait]
impl SimilaritySearch for SupabaseStore {
    async fn match_vocabulary(
        &self,
        embedding: &[f32],
        threshold: f32,
        limit: usize,
    ) -> KnowledgeResult<Vec<VocabularyEntry>> {
        self.rpc(Category::Vocabulary, embedding, threshold, limit)
            .await
    }

    async fn match_grammar(
        &self,
        embedding: &[f32],
        threshold: f32,
        limit: usize,
    ) -> KnowledgeResult<Vec<GrammarRuleEntry>> {
        self.rpc(Category::Grammar, embedding, threshold, limit)
            .await
    }

    async fn match_idioms(
        &self,
        embedding: &[f32],
        threshold: f32,
        limit: usize,
    ) -> KnowledgeResult<Vec<IdiomEntry>> {
        self.rpc(Category::Idioms, embedding, threshold, limit).await
    }

    async fn match_common_mistakes(
        &self,
        embedding: &[f32],
        threshold: f32,
        limit: usize,
    ) -> KnowledgeResult<Vec<CommonMistakeEntry>> {
        self.rpc(Category::CommonMistakes, embedding, threshold, limit)
            .await
    }

    async fn match_conversations(
        &self,
        embedding: &[f32],
        threshold: f32,
        limit: usize,
    ) -> KnowledgeResult<Vec<ConversationEntry>> {
        self.rpc(Category::Conversations, embedding, threshold, limit)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_params_serialize_flat() {
        let params = MatchParams {
            query_embedding: &[0.5, 0.25],
            match_threshold: 0.5,
            match_count: 1,
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["match_threshold"], 0.5);
        assert_eq!(json["match_count"], 1);
        assert_eq!(json["query_embedding"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let store = SupabaseStore::new("https://project.supabase.co/", "key").unwrap();
        assert_eq!(store.base_url, "https://project.supabase.co");
    }

    #[test]
    fn invalid_key_is_rejected() {
        let result = SupabaseStore::new("https://project.supabase.co", "bad\nkey");
        assert!(matches!(
            result.unwrap_err(),
            KnowledgeError::InvalidCredential
        ));
    }
}
