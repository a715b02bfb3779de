//! Answer composition: classify, extract, retrieve, generate.
//!
//! One request flows through intent classification and language detection,
//! then branches: small talk gets a conversational reply; knowledge
//! questions get keyword extraction and retrieval, falling back to guiding
//! replies when no keyword or no context is found. Only the final
//! generation call may propagate an error to the HTTP layer.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::Serialize;
use tracing::info;

use lexi_knowledge::Retriever;

use crate::classify::{Intent, Language, classify_intent, detect_language, extract_keyword};
use crate::providers::provider::{Provider, ProviderError};

/// Answer plus the context (or branch marker) it was grounded on.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerResponse {
    pub answer: String,
    pub source_context: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("generation failed: {0}")]
    Provider(#[from] ProviderError),
}

/// Drives one query through classification, retrieval, and generation.
pub struct AnswerComposer {
    provider: Arc<dyn Provider>,
    retriever: Retriever,
}

impl AnswerComposer {
    pub fn new(provider: Arc<dyn Provider>, retriever: Retriever) -> Self {
        Self {
            provider,
            retriever,
        }
    }

    pub async fn answer(&self, query: &str) -> Result<AnswerResponse, ComposeError> {
        let intent = classify_intent(self.provider.as_ref(), query).await;
        let language = detect_language(self.provider.as_ref(), query).await;
        info!("classified intent {intent:?}, language {language:?}");

        if intent == Intent::Conversational {
            let prompt = conversational_prompt(query, language);
            return self.finish(&prompt, "", "Conversational").await;
        }

        let keyword = extract_keyword(self.provider.as_ref(), query).await;
        if keyword.is_empty() {
            info!("Q&A intent without a usable keyword, guiding the user");
            let prompt = guidance_prompt(query, language);
            return self.finish(&prompt, "", "Conversational Fallback").await;
        }

        info!("searching context for '{keyword}'");
        let context = self.retriever.search_context(&keyword).await;
        if context.is_empty() {
            info!("no context found for '{keyword}'");
            let prompt = not_found_prompt(&keyword, language);
            return self.finish(&prompt, "", "Fallback").await;
        }

        let prompt = rag_prompt(&context, query, language);
        self.finish(&prompt, &context, &context).await
    }

    /// Run the final generation call, sanitize its markup against the
    /// supplied context, and tag the response with its source.
    async fn finish(
        &self,
        prompt: &str,
        context: &str,
        source_context: &str,
    ) -> Result<AnswerResponse, ComposeError> {
        let raw = self.provider.generate(prompt).await?;
        Ok(AnswerResponse {
            answer: strip_foreign_spans(&raw, context),
            source_context: source_context.to_string(),
        })
    }
}

/// Unwrap every `tts-word` span in `answer` that does not appear verbatim
/// in `context`. The context formatter is the only legitimate source of
/// that markup; generation models occasionally invent more.
fn strip_foreign_spans(answer: &str, context: &str) -> String {
    static TTS_SPAN: OnceLock<Regex> = OnceLock::new();
    let re = TTS_SPAN.get_or_init(|| {
        Regex::new(r#"<span class="tts-word">([^<]*)</span>"#).expect("valid span pattern")
    });

    re.replace_all(answer, |caps: &regex::Captures<'_>| {
        if context.contains(&caps[0]) {
            caps[0].to_string()
        } else {
            caps[1].to_string()
        }
    })
    .into_owned()
}

fn conversational_prompt(query: &str, language: Language) -> String {
    format!(
        "You are a friendly English tutor chatbot named English AI Tutor. \
         Respond conversationally to the user's message in {language}. \
         Keep it natural and brief. User message: '{query}'"
    )
}

fn guidance_prompt(query: &str, language: Language) -> String {
    format!(
        "You are a friendly English tutor. The user asked: '{query}'. \
         Respond helpfully in {language}, guiding them to ask about a specific \
         English word, grammar rule, or idiom. Answer in {language}."
    )
}

fn not_found_prompt(keyword: &str, language: Language) -> String {
    format!(
        "You are a friendly English tutor. Inform the user you couldn't find \
         info for '{keyword}'. Respond in {language}."
    )
}

fn rag_prompt(context: &str, query: &str, language: Language) -> String {
    format!(
        r#"You are an expert English tutor. Your task is to provide a comprehensive, bilingual answer based on the context, following a strict format.

**CRITICAL RULES:**
1.  Preserve HTML tags (e.g., `<span class="tts-word">...</span>`) EXACTLY as they appear in the context.
2.  DO NOT add new `tts-word` tags.
3.  Provide bilingual format (English and Vietnamese) for meanings/examples.
4.  Include phonetics if available.
5.  Start with a simple intro sentence.
6.  Respond in {language}.

**REQUIRED RESPONSE STRUCTURE EXAMPLE:**
Chào bạn! Từ "Superfluous" có ý nghĩa như sau:

- **Word:** <span class="tts-word">Superfluous</span>
- **Phonetic:** /suːˈpɜː.flu.əs/
- **Meaning:** Unnecessary, especially through being more than enough. (Không cần thiết, đặc biệt là khi nó nhiều hơn mức đủ.)
- **Example:** The report contained superfluous information that confused readers. (Bản báo cáo chứa thông tin thừa thãi làm độc giả bối rối.)
---
**Context:**
{context}
---
**User's question:**
{query}
---
**Your answer (in {language}, following all rules and structure):**"#
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::providers::provider::AudioPayload;
    use lexi_knowledge::{
        CommonMistakeEntry, ConversationEntry, Embedder, GrammarRuleEntry, IdiomEntry,
        KnowledgeResult, SimilaritySearch, TaskMode, VocabularyEntry,
    };

    /// Routes each helper prompt to a scripted reply and records every
    /// prompt it sees.
    struct ScriptedProvider {
        intent: String,
        language: String,
        keyword: String,
        answer: String,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn new(intent: &str, language: &str, keyword: &str, answer: &str) -> Self {
            Self {
                intent: intent.to_string(),
                language: language.to_string(),
                keyword: keyword.to_string(),
                answer: answer.to_string(),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn final_prompt(&self) -> String {
            self.prompts.lock().unwrap().last().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl Provider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "scripted-model"
        }

        async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            let reply = if prompt.contains("Classification:") {
                &self.intent
            } else if prompt.contains("Language:") {
                &self.language
            } else if prompt.contains("Keyword:") {
                &self.keyword
            } else {
                &self.answer
            };
            Ok(reply.clone())
        }

        async fn synthesize(
            &self,
            _prompt: &str,
            _voice: &str,
        ) -> Result<AudioPayload, ProviderError> {
            unreachable!("answer pipeline never synthesizes")
        }
    }

    #[derive(Default)]
    struct CountingEmbedder {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl Embedder for CountingEmbedder {
        async fn embed(&self, _text: &str, _mode: TaskMode) -> KnowledgeResult<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![0.5; 8])
        }
    }

    #[derive(Default)]
    struct CountingStore {
        calls: AtomicUsize,
        vocabulary: Vec<VocabularyEntry>,
    }

    #[async_trait::async_trait]
    impl SimilaritySearch for CountingStore {
        async fn match_vocabulary(
            &self,
            _embedding: &[f32],
            _threshold: f32,
            _limit: usize,
        ) -> KnowledgeResult<Vec<VocabularyEntry>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.vocabulary.clone())
        }

        async fn match_grammar(
            &self,
            _embedding: &[f32],
            _threshold: f32,
            _limit: usize,
        ) -> KnowledgeResult<Vec<GrammarRuleEntry>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        async fn match_idioms(
            &self,
            _embedding: &[f32],
            _threshold: f32,
            _limit: usize,
        ) -> KnowledgeResult<Vec<IdiomEntry>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        async fn match_common_mistakes(
            &self,
            _embedding: &[f32],
            _threshold: f32,
            _limit: usize,
        ) -> KnowledgeResult<Vec<CommonMistakeEntry>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        async fn match_conversations(
            &self,
            _embedding: &[f32],
            _threshold: f32,
            _limit: usize,
        ) -> KnowledgeResult<Vec<ConversationEntry>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    fn composer(
        provider: Arc<ScriptedProvider>,
        embedder: Arc<CountingEmbedder>,
        store: Arc<CountingStore>,
    ) -> AnswerComposer {
        AnswerComposer::new(provider, Retriever::new(embedder, store, 0.65, 1))
    }

    #[tokio::test]
    async fn conversational_queries_skip_extraction_and_retrieval() {
        let provider = Arc::new(ScriptedProvider::new(
            "Conversational",
            "Vietnamese",
            "unused",
            "Chào bạn!",
        ));
        let embedder = Arc::new(CountingEmbedder::default());
        let store = Arc::new(CountingStore::default());
        let composer = composer(
            Arc::clone(&provider),
            Arc::clone(&embedder),
            Arc::clone(&store),
        );

        let response = composer.answer("xin chào").await.unwrap();

        assert_eq!(response.source_context, "Conversational");
        assert_eq!(response.answer, "Chào bạn!");
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
        // classify + detect + one conversational generation, no keyword call
        assert_eq!(provider.prompts.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn missing_keyword_guides_the_user() {
        let provider = Arc::new(ScriptedProvider::new(
            "Q&A",
            "Vietnamese",
            "",
            "Bạn muốn hỏi về từ nào?",
        ));
        let embedder = Arc::new(CountingEmbedder::default());
        let store = Arc::new(CountingStore::default());
        let composer = composer(
            Arc::clone(&provider),
            Arc::clone(&embedder),
            Arc::clone(&store),
        );

        let response = composer.answer("giúp tôi học").await.unwrap();

        assert_eq!(response.source_context, "Conversational Fallback");
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn vocabulary_hit_grounds_the_answer_in_context() {
        let provider = Arc::new(ScriptedProvider::new(
            "Q&A",
            "English",
            "ubiquitous",
            "Sure! - **Word:** <span class=\"tts-word\">ubiquitous</span> means present everywhere.",
        ));
        let embedder = Arc::new(CountingEmbedder::default());
        let store = Arc::new(CountingStore {
            vocabulary: vec![VocabularyEntry {
                word: "ubiquitous".to_string(),
                phonetic: Some("/juːˈbɪk.wɪ.təs/".to_string()),
                meaning: "present everywhere".to_string(),
                example: None,
            }],
            ..Default::default()
        });
        let composer = composer(
            Arc::clone(&provider),
            Arc::clone(&embedder),
            Arc::clone(&store),
        );

        let response = composer.answer("what does ubiquitous mean?").await.unwrap();

        let span = "<span class=\"tts-word\">ubiquitous</span>";
        assert_eq!(response.source_context.matches(span).count(), 1);
        assert!(response.answer.contains(span));
        // The generation prompt embeds the formatted context verbatim.
        assert!(provider.final_prompt().contains(&response.source_context));
        assert!(provider.final_prompt().contains("what does ubiquitous mean?"));
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn empty_context_falls_back() {
        let provider = Arc::new(ScriptedProvider::new(
            "Q&A",
            "Vietnamese",
            "zyzzyva",
            "Mình không tìm thấy thông tin về từ này.",
        ));
        let embedder = Arc::new(CountingEmbedder::default());
        let store = Arc::new(CountingStore::default());
        let composer = composer(
            Arc::clone(&provider),
            Arc::clone(&embedder),
            Arc::clone(&store),
        );

        let response = composer.answer("zyzzyva là gì?").await.unwrap();

        assert_eq!(response.source_context, "Fallback");
        assert!(provider.final_prompt().contains("'zyzzyva'"));
        assert_eq!(store.calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn invented_spans_are_unwrapped() {
        let provider = Arc::new(ScriptedProvider::new(
            "Conversational",
            "English",
            "unused",
            "Hi <span class=\"tts-word\">there</span>!",
        ));
        let embedder = Arc::new(CountingEmbedder::default());
        let store = Arc::new(CountingStore::default());
        let composer = composer(provider, embedder, store);

        let response = composer.answer("hello").await.unwrap();

        assert_eq!(response.answer, "Hi there!");
    }

    #[test]
    fn spans_from_context_survive_sanitation() {
        let context = "- Word: <span class=\"tts-word\">frugal</span>\n  Meaning: economical";
        let answer = "The word <span class=\"tts-word\">frugal</span> and \
                      <span class=\"tts-word\">thrifty</span> are related.";

        let cleaned = strip_foreign_spans(answer, context);

        assert!(cleaned.contains("<span class=\"tts-word\">frugal</span>"));
        assert!(cleaned.contains(" thrifty "));
        assert!(!cleaned.contains("<span class=\"tts-word\">thrifty</span>"));
    }

    #[test]
    fn sanitation_without_context_unwraps_everything() {
        let answer = "<span class=\"tts-word\">hello</span> world";
        assert_eq!(strip_foreign_spans(answer, ""), "hello world");
    }

    #[test]
    fn prompts_embed_the_detected_language() {
        let prompt = conversational_prompt("hi", Language::English);
        assert!(prompt.contains("in English"));

        let prompt = not_found_prompt("frugal", Language::Vietnamese);
        assert!(prompt.contains("'frugal'"));
        assert!(prompt.contains("Respond in Vietnamese"));
    }
}
