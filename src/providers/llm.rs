//! LLM provider trait for answer generation

use async_trait::async_trait;

use crate::error::Result;

/// Trait for the opaque prompt → text function
///
/// Endpoint failures of any kind (timeout, authentication, quota,
/// malformed response) surface as [`crate::Error::Generation`]; the
/// pipeline performs no retries, that policy belongs to the caller.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Submit an assembled prompt and return the raw text response
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model identifier being used
    fn model(&self) -> &str;
}
