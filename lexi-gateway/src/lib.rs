pub mod classify;
pub mod compose;
pub mod providers;
pub mod retry;
pub mod server;
pub mod speech;
pub mod state;
pub mod wav;

pub use compose::{AnswerComposer, AnswerResponse, ComposeError};
pub use providers::provider::{AudioPayload, Provider, ProviderError};
pub use retry::RetryPolicy;
pub use speech::{SpeechError, SpeechPipeline};
pub use state::AppState;
