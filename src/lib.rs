//! A single-page question/answer form backed by Google Gemini.
//!
//! The interesting part is [`query::ask`]: it takes one prompt, sends it to the
//! configured model through an [`LLMProvider`], and returns the answer text
//! unchanged, or an [`Error`] whose [`ErrorKind`] tells the caller what went wrong.

pub mod error;
pub mod types;
pub mod provider;
pub mod providers;
pub mod response;
pub mod factory;
pub mod query;
pub mod server;

// Re-export core types for easy usage
pub use error::{Error, ErrorKind};
pub use types::*;
pub use provider::LLMProvider;
pub use providers::*;
pub use response::*;
pub use factory::{GeminiFactory, ProviderFactory};
pub use query::{ask, QueryService};
