use serde::Deserialize;

/// Knowledge categories, in the order they appear in formatted context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Vocabulary,
    Grammar,
    Idioms,
    CommonMistakes,
    Conversations,
}

impl Category {
    /// All categories in their fixed formatting order.
    pub const ALL: [Category; 5] = [
        Category::Vocabulary,
        Category::Grammar,
        Category::Idioms,
        Category::CommonMistakes,
        Category::Conversations,
    ];

    /// Postgres function the store exposes for this category.
    pub fn rpc_function(self) -> &'static str {
        match self {
            Self::Vocabulary => "match_vocabulary",
            Self::Grammar => "match_grammar_rules",
            Self::Idioms => "match_idioms",
            Self::CommonMistakes => "match_common_mistakes",
            Self::Conversations => "match_conversation_examples",
        }
    }

    /// Section header used in formatted context.
    pub fn label(self) -> &'static str {
        match self {
            Self::Vocabulary => "Thông tin về từ vựng:",
            Self::Grammar => "Thông tin về ngữ pháp:",
            Self::Idioms => "Thông tin về thành ngữ:",
            Self::CommonMistakes => "Thông tin về lỗi thường gặp:",
            Self::Conversations => "Hội thoại mẫu:",
        }
    }
}

/// A vocabulary entry as stored in the knowledge base.
#[derive(Debug, Clone, Deserialize)]
pub struct VocabularyEntry {
    pub word: String,
    #[serde(default)]
    pub phonetic: Option<String>,
    pub meaning: String,
    #[serde(default)]
    pub example: Option<String>,
}

/// A grammar rule entry.
#[derive(Debug, Clone, Deserialize)]
pub struct GrammarRuleEntry {
    pub rule: String,
    pub explanation: String,
    #[serde(default)]
    pub example: Option<String>,
}

/// An idiom entry.
#[derive(Debug, Clone, Deserialize)]
pub struct IdiomEntry {
    pub phrase: String,
    pub meaning: String,
    #[serde(default)]
    pub example: Option<String>,
}

/// A common learner mistake with its correction.
#[derive(Debug, Clone, Deserialize)]
pub struct CommonMistakeEntry {
    pub mistake: String,
    pub correction: String,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// A sample conversation for a situation.
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationEntry {
    pub situation: String,
    pub dialogue: String,
}

/// Per-category matches for one query, discarded after formatting.
///
/// Each list holds up to the configured result cap; the deployed
/// configuration caps at one item per category.
#[derive(Debug, Clone, Default)]
pub struct SearchHits {
    pub vocabulary: Vec<VocabularyEntry>,
    pub grammar: Vec<GrammarRuleEntry>,
    pub idioms: Vec<IdiomEntry>,
    pub common_mistakes: Vec<CommonMistakeEntry>,
    pub conversations: Vec<ConversationEntry>,
}

impl SearchHits {
    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
            && self.grammar.is_empty()
            && self.idioms.is_empty()
            && self.common_mistakes.is_empty()
            && self.conversations.is_empty()
    }
}
