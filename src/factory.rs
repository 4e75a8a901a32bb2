use reqwest::Client;

use crate::providers::GeminiProvider;
use crate::types::{AppConfig, Credential};
use crate::{Error, LLMProvider};

/// Builds a provider bound to a credential and a model identifier.
pub trait ProviderFactory: Send + Sync + 'static {
    fn create(&self, credential: &Credential, model: &str) -> Result<Box<dyn LLMProvider>, Error>;
}

/// Factory for Gemini providers. All providers share one connection pool.
#[derive(Clone)]
pub struct GeminiFactory {
    client: Client,
    base_url: String,
}

impl GeminiFactory {
    /// Create a factory using the timeout and base URL from `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        Ok(Self {
            client: GeminiProvider::build_client(config.timeout)?,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl ProviderFactory for GeminiFactory {
    fn create(&self, credential: &Credential, model: &str) -> Result<Box<dyn LLMProvider>, Error> {
        let provider = GeminiProvider::with_client(
            self.client.clone(),
            credential,
            model,
            self.base_url.clone(),
        )?;
        Ok(Box::new(provider))
    }
}
