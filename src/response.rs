//! Response handling for model generations.

use serde::{Deserialize, Serialize};

/// Reason why a generation finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinishReason {
    /// Natural stop point.
    Stop,
    /// Hit the output token limit.
    Length,
    /// Stopped by the service's content filters.
    ContentFilter,
    /// Anything the service reports that we do not model.
    Other,
}

/// Token usage information.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A complete response from a provider.
#[derive(Debug, Clone)]
pub struct CompleteResponse {
    pub text: String,
    pub finish_reason: FinishReason,
    pub usage: Usage,
}

impl CompleteResponse {
    /// Text-only response that stopped normally.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            finish_reason: FinishReason::Stop,
            usage: Usage::default(),
        }
    }

    pub fn content(&self) -> &str {
        &self.text
    }

    pub fn into_content(self) -> String {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_response_creation() {
        let response = CompleteResponse::from_text("Hello, world!");

        assert_eq!(response.content(), "Hello, world!");
        assert_eq!(response.finish_reason, FinishReason::Stop);
        assert_eq!(response.usage, Usage::default());
        assert_eq!(response.into_content(), "Hello, world!");
    }
}
