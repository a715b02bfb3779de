//! Formats per-category search hits into a single context block.
//!
//! The vocabulary headword is wrapped in the `tts-word` span here and
//! nowhere else; downstream consumers preserve it verbatim but must never
//! introduce it themselves.

use crate::models::{Category, SearchHits};

/// Render hits in the fixed category order, skipping empty categories.
/// Returns an empty string when nothing matched.
pub fn format_context(hits: &SearchHits) -> String {
    let mut context = String::new();

    if !hits.vocabulary.is_empty() {
        context.push_str(&format!("\n{}\n", Category::Vocabulary.label()));
        for item in &hits.vocabulary {
            context.push_str(&format!(
                "- Word: <span class=\"tts-word\">{}</span>\n",
                item.word
            ));
            if let Some(phonetic) = &item.phonetic {
                context.push_str(&format!("  Phonetic: {phonetic}\n"));
            }
            context.push_str(&format!("  Meaning: {}\n", item.meaning));
            if let Some(example) = &item.example {
                context.push_str(&format!("  Example: {example}\n"));
            }
        }
    }

    if !hits.grammar.is_empty() {
        context.push_str(&format!("\n{}\n", Category::Grammar.label()));
        for item in &hits.grammar {
            context.push_str(&format!("- Rule: {}\n", item.rule));
            context.push_str(&format!("  Explanation: {}\n", item.explanation));
            if let Some(example) = &item.example {
                context.push_str(&format!("  Example: {example}\n"));
            }
        }
    }

    if !hits.idioms.is_empty() {
        context.push_str(&format!("\n{}\n", Category::Idioms.label()));
        for item in &hits.idioms {
            context.push_str(&format!("- Phrase: {}\n", item.phrase));
            context.push_str(&format!("  Meaning: {}\n", item.meaning));
            if let Some(example) = &item.example {
                context.push_str(&format!("  Example: {example}\n"));
            }
        }
    }

    if !hits.common_mistakes.is_empty() {
        context.push_str(&format!("\n{}\n", Category::CommonMistakes.label()));
        for item in &hits.common_mistakes {
            context.push_str(&format!("- Mistake: {}\n", item.mistake));
            context.push_str(&format!("  Correction: {}\n", item.correction));
            if let Some(explanation) = &item.explanation {
                context.push_str(&format!("  Explanation: {explanation}\n"));
            }
        }
    }

    if !hits.conversations.is_empty() {
        context.push_str(&format!("\n{}\n", Category::Conversations.label()));
        for item in &hits.conversations {
            context.push_str(&format!("- Situation: {}\n", item.situation));
            context.push_str(&format!("  Dialogue: {}\n", item.dialogue));
        }
    }

    context.trim().to_string()
}
