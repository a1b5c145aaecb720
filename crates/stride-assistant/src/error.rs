//! Error types for the shopping assistant.

use stride_core::error::StrideError;

/// Errors from the assistant bridge.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("assistant is disabled: {0}")]
    Disabled(String),
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("failed to build chat client: {0}")]
    ClientBuild(String),
    #[error("chat request failed: {0}")]
    Request(String),
    #[error("chat API returned {status}: {message}")]
    Http { status: u16, message: String },
    #[error("chat API returned no content")]
    EmptyResponse,
}

impl AssistantError {
    /// Failures caused by the upstream API rather than the caller's input.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            AssistantError::Request(_) | AssistantError::Http { .. } | AssistantError::EmptyResponse
        )
    }
}

impl From<AssistantError> for StrideError {
    fn from(err: AssistantError) -> Self {
        StrideError::Assistant(err.to_string())
    }
}
