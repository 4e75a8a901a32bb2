use serde::{Serialize, Serializer};
use thiserror::Error;

/// Errors that can occur when asking the model a question.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Rate limit exceeded")]
    RateLimit,

    #[error("Model returned no text: {0}")]
    EmptyResponse(String),

    #[error("Query task failed: {0}")]
    TaskFailed(String),
}

/// The three outcomes a caller has to tell apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid credential.
    Configuration,
    /// Network failure or a service-side error.
    Transport,
    /// The service answered but produced no usable text.
    EmptyResponse,
}

impl ErrorKind {
    /// Stable machine-readable name, used in JSON bodies and page markup.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Transport => "transport",
            ErrorKind::EmptyResponse => "empty_response",
        }
    }

    /// Message shown to the person who submitted the form.
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => {
                "The application is not configured with a valid API key. Set GOOGLE_API_KEY and restart."
            }
            ErrorKind::Transport => {
                "The model service could not be reached or returned an error. Please try again."
            }
            ErrorKind::EmptyResponse => {
                "The model returned no text for this question. Try rephrasing it."
            }
        }
    }
}

impl Serialize for ErrorKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl Error {
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    pub fn empty_response(reason: impl Into<String>) -> Self {
        Error::EmptyResponse(reason.into())
    }

    /// Classify this error for the presentation layer.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) => ErrorKind::Configuration,
            Error::EmptyResponse(_) => ErrorKind::EmptyResponse,
            Error::Http(_)
            | Error::Serialization(_)
            | Error::Provider { .. }
            | Error::RateLimit
            | Error::TaskFailed(_) => ErrorKind::Transport,
        }
    }
}
