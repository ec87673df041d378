use thiserror::Error;

/// Local precondition failures. These never reach the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("text is empty")]
    EmptyInput,
    #[error("text is too long (maximum {0} characters)")]
    TooLong(usize),
    #[error("languages cannot be swapped while auto-detect is selected")]
    AutoSwapUnsupported,
}

/// Failures of a dispatched translation request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationError {
    /// Non-2xx status, network failure, timeout, or an undecodable body.
    #[error("translation service unreachable: {0}")]
    Transport(String),
    /// The service answered but reported `success: false`.
    #[error("translation failed: {0}")]
    Application(String),
}

impl TranslationError {
    /// Human-readable reason handed to the notification sink.
    pub fn reason(&self) -> &str {
        match self {
            TranslationError::Transport(msg) => msg,
            TranslationError::Application(msg) => msg,
        }
    }
}
