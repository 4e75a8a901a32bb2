/// The text a user submits. Carried to the model unmodified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prompt {
    text: String,
}

impl Prompt {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl From<&str> for Prompt {
    fn from(s: &str) -> Self {
        Prompt::new(s)
    }
}

impl From<String> for Prompt {
    fn from(s: String) -> Self {
        Prompt::new(s)
    }
}

/// A single generation request handed to a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LLMRequest {
    pub model: String,
    pub prompt: Prompt,
}

impl LLMRequest {
    /// Build a request for `model` from anything convertible into a prompt.
    pub fn from_prompt(model: impl Into<String>, prompt: impl Into<Prompt>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
        }
    }
}
