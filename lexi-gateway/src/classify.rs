//! Intent, language, and keyword helpers backed by one generation call each.
//!
//! All three absorb every failure and return a safe default; nothing on
//! this path may propagate an error to the caller.

use std::fmt;

use tracing::warn;

use crate::providers::provider::Provider;

/// Request intent derived from the user's query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    QnA,
    Conversational,
}

/// Language the answer should be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Vietnamese,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::English => "English",
            Self::Vietnamese => "Vietnamese",
        })
    }
}

/// Classify the query as knowledge-seeking or small talk.
pub async fn classify_intent(provider: &dyn Provider, query: &str) -> Intent {
    let prompt = intent_prompt(query);
    match provider.generate(&prompt).await {
        Ok(raw) => parse_intent(&raw),
        Err(e) => {
            warn!("intent classification failed: {e}");
            Intent::QnA
        }
    }
}

/// Detect the query language, defaulting to Vietnamese.
pub async fn detect_language(provider: &dyn Provider, query: &str) -> Language {
    let prompt = language_prompt(query);
    match provider.generate(&prompt).await {
        Ok(raw) => parse_language(&raw),
        Err(e) => {
            warn!("language detection failed: {e}");
            Language::Vietnamese
        }
    }
}

/// Extract the main English keyword from a Q&A query.
///
/// An empty string is a meaningful result: the query carried no usable
/// keyword.
pub async fn extract_keyword(provider: &dyn Provider, query: &str) -> String {
    let prompt = keyword_prompt(query);
    match provider.generate(&prompt).await {
        Ok(raw) => raw.trim().replace('"', "").trim().to_string(),
        Err(e) => {
            warn!("keyword extraction failed: {e}");
            String::new()
        }
    }
}

fn parse_intent(raw: &str) -> Intent {
    match raw.trim() {
        "Conversational" => Intent::Conversational,
        "Q&A" => Intent::QnA,
        _ => Intent::QnA,
    }
}

fn parse_language(raw: &str) -> Language {
    let cleaned = raw.trim().replace(['\'', '"'], "");
    if cleaned.to_lowercase().contains("english") {
        Language::English
    } else {
        Language::Vietnamese
    }
}

fn intent_prompt(query: &str) -> String {
    format!(
        r#"Classify the user's query into "Q&A" (asking for knowledge) or "Conversational" (small talk).

Examples:
- "What does ubiquitous mean?" -> Q&A
- "cho tôi ví dụ về 'break a leg'" -> Q&A
- "xin chào" -> Conversational
- "hello" -> Conversational
- "hi" -> Conversational
- "cảm ơn bạn" -> Conversational
- "bạn là ai?" -> Conversational
- "tôi muốn học tiếng anh" -> Conversational
- "thì hiện tại đơn" -> Q&A
- "Frugal có nghĩa là gì vậy" -> Q&A
- "hội thoại đặt đồ ăn" -> Q&A

Query: "{query}"
Classification:"#
    )
}

fn language_prompt(query: &str) -> String {
    format!(
        r#"Detect the language of the following text. Respond with ONLY 'Vietnamese' or 'English'.
If unsure, default to 'Vietnamese'.
Text: "{query}"
Language:"#
    )
}

fn keyword_prompt(query: &str) -> String {
    format!(
        r#"Extract the main English keyword or phrase from the following query. Return only the keyword.
If there is no usable English keyword, return nothing.
Query: "{query}"
Keyword:"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::provider::{AudioPayload, ProviderError};

    struct FailingProvider;

    #[async_trait::async_trait]
    impl Provider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        fn model(&self) -> &str {
            "none"
        }

        async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
            Err(ProviderError::NoContent)
        }

        async fn synthesize(
            &self,
            _prompt: &str,
            _voice: &str,
        ) -> Result<AudioPayload, ProviderError> {
            Err(ProviderError::NoContent)
        }
    }

    #[test]
    fn exact_labels_parse() {
        assert_eq!(parse_intent("Q&A"), Intent::QnA);
        assert_eq!(parse_intent(" Conversational \n"), Intent::Conversational);
    }

    #[test]
    fn unknown_labels_default_to_qna() {
        assert_eq!(parse_intent("Knowledge question"), Intent::QnA);
        assert_eq!(parse_intent(""), Intent::QnA);
        assert_eq!(parse_intent("conversational"), Intent::QnA);
    }

    #[test]
    fn english_substring_wins_case_insensitively() {
        assert_eq!(parse_language("English"), Language::English);
        assert_eq!(parse_language("'english'"), Language::English);
        assert_eq!(
            parse_language("The language is ENGLISH."),
            Language::English
        );
    }

    #[test]
    fn anything_else_is_vietnamese() {
        assert_eq!(parse_language("Vietnamese"), Language::Vietnamese);
        assert_eq!(parse_language("French"), Language::Vietnamese);
        assert_eq!(parse_language(""), Language::Vietnamese);
    }

    #[test]
    fn language_display_matches_prompt_wording() {
        assert_eq!(Language::English.to_string(), "English");
        assert_eq!(Language::Vietnamese.to_string(), "Vietnamese");
    }

    #[tokio::test]
    async fn provider_failures_degrade_to_defaults() {
        let provider = FailingProvider;
        assert_eq!(classify_intent(&provider, "hello").await, Intent::QnA);
        assert_eq!(
            detect_language(&provider, "hello").await,
            Language::Vietnamese
        );
        assert_eq!(extract_keyword(&provider, "hello").await, "");
    }
}
