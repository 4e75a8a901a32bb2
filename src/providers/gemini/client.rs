use reqwest::header::HeaderValue;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

use super::types::*;
use crate::provider::LLMProvider;
use crate::types::{Credential, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::{CompleteResponse, Error, LLMRequest};

const PROVIDER: &str = "Gemini";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini provider implementation via the Generative Language API.
pub struct GeminiProvider {
    client: Client,
    api_key: HeaderValue,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider bound to `credential` and `model`.
    pub fn new(
        credential: &Credential,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let client = Self::build_client(timeout)?;
        Self::with_client(client, credential, model, DEFAULT_BASE_URL)
    }

    /// Create a new Gemini provider with custom base URL (for testing).
    pub fn new_with_base_url(
        credential: &Credential,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, Error> {
        let client = Self::build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?;
        Self::with_client(client, credential, model, base_url)
    }

    /// Create a provider around an existing (pooled) HTTP client.
    ///
    /// Fails with a configuration error if the credential cannot be sent as a header.
    pub fn with_client(
        client: Client,
        credential: &Credential,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, Error> {
        let mut api_key = HeaderValue::from_str(credential.expose()).map_err(|_| {
            Error::config("API key contains characters that are not allowed in an HTTP header")
        })?;
        api_key.set_sensitive(true);

        Ok(Self {
            client,
            api_key,
            model: model.into(),
            base_url: base_url.into(),
        })
    }

    /// HTTP client with the request timeout applied.
    pub fn build_client(timeout: Duration) -> Result<Client, Error> {
        Ok(Client::builder().timeout(timeout).build()?)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get the API endpoint for the model.
    fn get_endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }

    /// Turn a non-success status into an error, pulling the message out of
    /// Google's error envelope when there is one.
    fn convert_error(status: StatusCode, body: &str) -> Error {
        let envelope = serde_json::from_str::<GeminiErrorEnvelope>(body).ok();
        let message = envelope
            .as_ref()
            .map(|e| e.error.message.clone())
            .unwrap_or_else(|| body.to_string());

        let invalid_key = envelope
            .as_ref()
            .is_some_and(|e| e.error.message.contains("API key"));

        match status {
            StatusCode::TOO_MANY_REQUESTS => Error::RateLimit,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Error::config(format!("credential rejected ({status}): {message}"))
            }
            StatusCode::BAD_REQUEST if invalid_key => {
                Error::config(format!("credential rejected ({status}): {message}"))
            }
            _ => Error::provider(PROVIDER, format!("API error ({status}): {message}")),
        }
    }

    /// Extract the answer from a successful response body.
    fn convert_response(response: GeminiResponse) -> Result<CompleteResponse, Error> {
        if let Some(reason) = response
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return Err(Error::empty_response(format!("prompt blocked: {reason}")));
        }

        let candidate = response
            .candidates
            .first()
            .ok_or_else(|| Error::empty_response("no candidates in response"))?;

        let finish_reason = candidate.finish_reason();
        let text = candidate.text().ok_or_else(|| {
            Error::empty_response(format!(
                "candidate has no text (finish reason {finish_reason:?})"
            ))
        })?;

        let usage = response
            .usage_metadata
            .map(|meta| meta.into())
            .unwrap_or_default();

        Ok(CompleteResponse {
            text,
            finish_reason,
            usage,
        })
    }
}

#[async_trait::async_trait]
impl LLMProvider for GeminiProvider {
    async fn generate(&self, request: &LLMRequest) -> Result<CompleteResponse, Error> {
        let gemini_request = GeminiRequest {
            contents: vec![GeminiContent::user_text(request.prompt.text())],
        };

        let endpoint = self.get_endpoint(&request.model);
        debug!(%endpoint, "sending generateContent request");

        let response = self
            .client
            .post(&endpoint)
            .header(API_KEY_HEADER, self.api_key.clone())
            .json(&gemini_request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(%status, "Gemini API returned an error");
            return Err(Self::convert_error(status, &body));
        }

        let gemini_response: GeminiResponse = serde_json::from_str(&body)?;
        Self::convert_response(gemini_response)
    }
}
