use crate::error::ServiceError;

/// Turns a block of notes into a natural-language insight summary
///
/// Implementations:
/// - `GeminiAnalyzer`: Google Generative Language `generateContent`
#[async_trait::async_trait]
pub trait AnalyzerClient: Send + Sync {
    /// Analyze a non-empty text block, returning a non-empty summary
    async fn analyze(&self, text: &str) -> Result<String, ServiceError>;

    /// Name for logging
    fn name(&self) -> &str;
}
