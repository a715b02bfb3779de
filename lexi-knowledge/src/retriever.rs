//! Embeds a search term and gathers per-category matches into formatted
//! context.

use std::sync::Arc;

use tracing::warn;

use crate::embeddings::{Embedder, TaskMode};
use crate::errors::KnowledgeResult;
use crate::format::format_context;
use crate::models::SearchHits;
use crate::store::SimilaritySearch;

/// Orchestrates embedding, the five category lookups, and formatting.
#[derive(Clone)]
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn SimilaritySearch>,
    match_threshold: f32,
    match_count: usize,
}

impl Retriever {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn SimilaritySearch>,
        match_threshold: f32,
        match_count: usize,
    ) -> Self {
        Self {
            embedder,
            store,
            match_threshold,
            match_count,
        }
    }

    /// Formatted context for `term`, or an empty string when the term is
    /// empty, nothing matches, or any lookup fails. Partial results are
    /// discarded rather than returned.
    pub async fn search_context(&self, term: &str) -> String {
        if term.trim().is_empty() {
            return String::new();
        }

        match self.gather(term).await {
            Ok(hits) => format_context(&hits),
            Err(e) => {
                warn!("context search for '{term}' failed: {e}");
                String::new()
            }
        }
    }

    async fn gather(&self, term: &str) -> KnowledgeResult<SearchHits> {
        let embedding = self.embedder.embed(term, TaskMode::Query).await?;

        // The five lookups are independent; issue them concurrently and
        // fail the whole operation if any single one fails.
        let (vocabulary, grammar, idioms, common_mistakes, conversations) = tokio::try_join!(
            self.store
                .match_vocabulary(&embedding, self.match_threshold, self.match_count),
            self.store
                .match_grammar(&embedding, self.match_threshold, self.match_count),
            self.store
                .match_idioms(&embedding, self.match_threshold, self.match_count),
            self.store
                .match_common_mistakes(&embedding, self.match_threshold, self.match_count),
            self.store
                .match_conversations(&embedding, self.match_threshold, self.match_count),
        )?;

        Ok(SearchHits {
            vocabulary,
            grammar,
            idioms,
            common_mistakes,
            conversations,
        })
    }
}
