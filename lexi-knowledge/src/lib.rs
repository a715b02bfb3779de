//! Knowledge retrieval for the lexi tutor.
//!
//! Owns every store-facing client: the embedding client, the Supabase
//! similarity-search RPC client, the blob storage client for cached audio,
//! and the retriever that turns a search term into a formatted context block.

pub mod embeddings;
pub mod errors;
pub mod format;
pub mod models;
pub mod retriever;
pub mod storage;
pub mod store;

pub use embeddings::{Embedder, EmbeddingClient, TaskMode};
pub use errors::{KnowledgeError, KnowledgeResult};
pub use format::format_context;
pub use models::{
    Category, CommonMistakeEntry, ConversationEntry, GrammarRuleEntry, IdiomEntry, SearchHits,
    VocabularyEntry,
};
pub use retriever::Retriever;
pub use storage::{BlobStore, SupabaseStorage};
pub use store::{SimilaritySearch, SupabaseStore};
