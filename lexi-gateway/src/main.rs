use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lexi_gateway::compose::AnswerComposer;
use lexi_gateway::providers::gemini::GeminiClient;
use lexi_gateway::retry::RetryPolicy;
use lexi_gateway::server;
use lexi_gateway::speech::SpeechPipeline;
use lexi_gateway::state::AppState;
use lexi_knowledge::{EmbeddingClient, Retriever, SupabaseStorage, SupabaseStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration; missing secrets abort here, before serving anything
    let config = lexi_core::Config::load()?;
    info!(
        "Configuration loaded (generation: {}, tts: {}, embedding: {})",
        config.settings.models.generation, config.settings.models.tts,
        config.settings.models.embedding
    );

    // Knowledge-side clients
    let embedder = Arc::new(EmbeddingClient::new(
        config.secrets.gemini_api_key.as_str(),
        config.settings.models.embedding.as_str(),
    ));
    let store = Arc::new(SupabaseStore::new(
        config.secrets.supabase_url.as_str(),
        &config.secrets.supabase_service_key,
    )?);
    let audio_cache = Arc::new(SupabaseStorage::new(
        config.secrets.supabase_url.as_str(),
        &config.secrets.supabase_service_key,
        config.settings.speech.bucket.as_str(),
    )?);
    let retriever = Retriever::new(
        embedder,
        store,
        config.settings.retrieval.match_threshold,
        config.settings.retrieval.match_count,
    );
    info!(
        "Knowledge store ready (threshold {}, {} result(s) per category)",
        config.settings.retrieval.match_threshold, config.settings.retrieval.match_count
    );

    // One generation client per model role
    let generation = Arc::new(GeminiClient::new(
        config.secrets.gemini_api_key.as_str(),
        config.settings.models.generation.as_str(),
    ));
    let tts = Arc::new(GeminiClient::new(
        config.secrets.gemini_api_key.as_str(),
        config.settings.models.tts.as_str(),
    ));

    let composer = AnswerComposer::new(generation, retriever);
    let retry = RetryPolicy::new(
        config.settings.speech.max_attempts,
        Duration::from_secs(config.settings.speech.retry_backoff_secs),
    );
    let speech = SpeechPipeline::new(
        tts,
        audio_cache,
        config.settings.speech.voice.as_str(),
        retry,
    );

    let state = Arc::new(AppState::new(composer, speech));

    let bind_addr = config.bind_addr();
    info!("Starting lexi gateway on {}", bind_addr);
    server::run(state, &bind_addr).await
}
