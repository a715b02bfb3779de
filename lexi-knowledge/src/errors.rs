#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid store credential")]
    InvalidCredential,
    #[error("embedding error: {0}")]
    Embedding(String),
    #[error("store rpc {function} failed: {status} {message}")]
    Rpc {
        function: &'static str,
        status: u16,
        message: String,
    },
    #[error("blob storage error: {status} {message}")]
    Storage { status: u16, message: String },
}

pub type KnowledgeResult<T> = Result<T, KnowledgeError>;
