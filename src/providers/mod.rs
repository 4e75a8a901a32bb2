//! Provider implementations for different model services.

pub mod gemini;

// Re-export commonly used provider types
pub use gemini::GeminiProvider;
