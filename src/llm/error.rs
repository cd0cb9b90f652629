use thiserror::Error;

/// LLM 层错误类型
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Provider configuration error: {message}")]
    Configuration { message: String },

    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Streaming error: {message}")]
    Stream { message: String },

    #[error("Network error: {source}")]
    Network {
        #[from]
        source: reqwest::Error,
    },
}

pub type LlmResult<T> = Result<T, LlmError>;
