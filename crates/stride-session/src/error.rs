//! Error types for session state.

use stride_core::error::StrideError;

/// Errors from the session store and bag.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("bag has no item at position {index} (bag size {len})")]
    BagIndexOutOfRange { index: usize, len: usize },
    #[error("session lock poisoned: {0}")]
    LockPoisoned(String),
}

impl From<SessionError> for StrideError {
    fn from(err: SessionError) -> Self {
        StrideError::Session(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_error_display() {
        let err = SessionError::BagIndexOutOfRange { index: 4, len: 2 };
        assert_eq!(err.to_string(), "bag has no item at position 4 (bag size 2)");

        let err = SessionError::LockPoisoned("boom".to_string());
        assert_eq!(err.to_string(), "session lock poisoned: boom");
    }

    #[test]
    fn test_into_stride_error() {
        let err: StrideError = SessionError::BagIndexOutOfRange { index: 0, len: 0 }.into();
        assert!(matches!(err, StrideError::Session(_)));
    }
}
