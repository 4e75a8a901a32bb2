use crate::{CompleteResponse, Error, LLMRequest};

/// A trait for providers that turn a prompt into generated text.
#[async_trait::async_trait]
pub trait LLMProvider: Send + Sync + 'static {
    /// Issue one generation request and wait for the full answer.
    async fn generate(&self, request: &LLMRequest) -> Result<CompleteResponse, Error>;
}
