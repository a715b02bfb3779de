use crate::compose::AnswerComposer;
use crate::speech::SpeechPipeline;

/// Shared application state
///
/// Read-only after startup; every request handler works off the same
/// pipelines behind an `Arc`.
pub struct AppState {
    /// Answer composition pipeline
    pub composer: AnswerComposer,
    /// Speech synthesis pipeline
    pub speech: SpeechPipeline,
}

impl AppState {
    pub fn new(composer: AnswerComposer, speech: SpeechPipeline) -> Self {
        Self { composer, speech }
    }
}
