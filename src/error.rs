use thiserror::Error;

/// Failure reported by an external collaborator (Gemini, Drive, local disk).
///
/// Network, auth, quota and malformed-response failures all land here; the
/// orchestrator does not distinguish between them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{service} error: {message}")]
pub struct ServiceError {
    pub service: &'static str,
    pub message: String,
}

impl ServiceError {
    pub fn new(service: &'static str, message: impl Into<String>) -> Self {
        Self {
            service,
            message: message.into(),
        }
    }
}

/// Terminal failure of a single `/analyze` invocation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InsightError {
    /// Command sender is not the allow-listed chat
    #[error("chat {0} is not allowed to run commands")]
    Permission(i64),

    /// Analyzer failed; the buffer was left untouched
    #[error("analysis failed: {0}")]
    Analysis(#[source] ServiceError),
}

impl InsightError {
    /// Stage of the pipeline that failed
    pub fn stage(&self) -> &'static str {
        match self {
            InsightError::Permission(_) => "authorization",
            InsightError::Analysis(_) => "analysis",
        }
    }

    /// Whether re-sending the same command may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, InsightError::Analysis(_))
    }
}
