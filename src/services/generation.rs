use async_trait::async_trait;

use crate::error::AppResult;

/// Text-generation seam. One prompt in, one completion out; the output
/// length bound lives in the implementation's configuration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Returns the first completion for the prompt. A response carrying no
    /// completion is an error, never an empty report.
    async fn complete(&self, prompt: &str) -> AppResult<String>;
}
