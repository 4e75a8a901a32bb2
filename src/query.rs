//! The query function: one prompt in, one model answer out.

use std::sync::Arc;

use tracing::{error, info};

use crate::factory::ProviderFactory;
use crate::types::{AppConfig, LLMRequest, Prompt};
use crate::Error;

/// Ask the configured model a single question.
///
/// The credential is checked before any client is built, so a missing key
/// never produces network traffic. The prompt is sent unmodified and the
/// answer is returned exactly as the service produced it.
#[tracing::instrument(
    skip_all,
    fields(request_id = %uuid::Uuid::new_v4(), model = %config.model)
)]
pub async fn ask(
    config: &AppConfig,
    factory: &dyn ProviderFactory,
    prompt: impl Into<Prompt>,
) -> Result<String, Error> {
    let credential = config.credential()?;
    let provider = factory.create(credential, &config.model)?;

    let request = LLMRequest::from_prompt(config.model.clone(), prompt);
    info!(prompt_len = request.prompt.text().len(), "submitting prompt");

    let response = provider.generate(&request).await?;
    if response.content().is_empty() {
        return Err(Error::empty_response("model returned an empty string"));
    }

    info!(
        answer_len = response.content().len(),
        finish_reason = ?response.finish_reason,
        output_tokens = response.usage.output_tokens,
        "received answer"
    );
    Ok(response.into_content())
}

/// Runs queries off the caller's task and hands the outcome back as a future.
#[derive(Clone)]
pub struct QueryService {
    config: Arc<AppConfig>,
    factory: Arc<dyn ProviderFactory>,
}

impl QueryService {
    pub fn new(config: Arc<AppConfig>, factory: Arc<dyn ProviderFactory>) -> Self {
        Self { config, factory }
    }

    /// Run one query on a background task.
    ///
    /// A panic inside the task is reported as a transport failure instead of
    /// taking the process down.
    pub async fn submit(&self, prompt: impl Into<Prompt>) -> Result<String, Error> {
        let config = Arc::clone(&self.config);
        let factory = Arc::clone(&self.factory);
        let prompt = prompt.into();

        let handle = tokio::spawn(async move { ask(&config, factory.as_ref(), prompt).await });

        match handle.await {
            Ok(result) => {
                if let Err(e) = &result {
                    error!(kind = ?e.kind(), error = %e, "query failed");
                }
                result
            }
            Err(join_error) => {
                error!(error = %join_error, "query task aborted");
                Err(Error::TaskFailed(join_error.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Credential;
    use crate::{CompleteResponse, ErrorKind, LLMProvider};
    use std::sync::Mutex;

    enum Behavior {
        Answer(&'static str),
        Fail,
        Panic,
    }

    /// Records every prompt that reaches the "network".
    struct StubFactory {
        behavior: Behavior,
        created: Mutex<Vec<(String, String)>>,
        sent: Arc<Mutex<Vec<LLMRequest>>>,
    }

    impl StubFactory {
        fn new(behavior: Behavior) -> Self {
            Self {
                behavior,
                created: Mutex::new(Vec::new()),
                sent: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn sent(&self) -> Vec<LLMRequest> {
            self.sent.lock().unwrap().clone()
        }
    }

    struct StubProvider {
        answer: Option<&'static str>,
        panic: bool,
        sent: Arc<Mutex<Vec<LLMRequest>>>,
    }

    #[async_trait::async_trait]
    impl LLMProvider for StubProvider {
        async fn generate(&self, request: &LLMRequest) -> Result<CompleteResponse, Error> {
            self.sent.lock().unwrap().push(request.clone());
            if self.panic {
                panic!("backend exploded");
            }
            match self.answer {
                Some(text) => Ok(CompleteResponse::from_text(text)),
                None => Err(Error::provider("Stub", "connection reset")),
            }
        }
    }

    impl ProviderFactory for StubFactory {
        fn create(
            &self,
            credential: &Credential,
            model: &str,
        ) -> Result<Box<dyn LLMProvider>, Error> {
            self.created
                .lock()
                .unwrap()
                .push((credential.expose().to_string(), model.to_string()));
            let (answer, panic) = match self.behavior {
                Behavior::Answer(text) => (Some(text), false),
                Behavior::Fail => (None, false),
                Behavior::Panic => (None, true),
            };
            Ok(Box::new(StubProvider {
                answer,
                panic,
                sent: Arc::clone(&self.sent),
            }))
        }
    }

    fn config_with_key() -> AppConfig {
        AppConfig::new(Credential::new("fake-key"))
    }

    #[tokio::test]
    async fn test_prompt_sent_once_unmodified() {
        let factory = StubFactory::new(Behavior::Answer("ok"));
        let prompt = "  Explain\tlifetimes, please?\n";

        ask(&config_with_key(), &factory, prompt).await.unwrap();

        let sent = factory.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].prompt.text(), prompt);
        assert_eq!(sent[0].model, "gemini-1.5-flash");

        let created = factory.created.lock().unwrap().clone();
        assert_eq!(
            created,
            vec![("fake-key".to_string(), "gemini-1.5-flash".to_string())]
        );
    }

    #[tokio::test]
    async fn test_answer_returned_verbatim() {
        let answer = "  Four.\n\n**Bold** <b>tags</b> stay as they are  ";
        let factory = StubFactory::new(Behavior::Answer(answer));

        let result = ask(&config_with_key(), &factory, "2+2=?").await.unwrap();
        assert_eq!(result, answer);
    }

    #[tokio::test]
    async fn test_missing_credential_makes_no_call() {
        let factory = StubFactory::new(Behavior::Answer("unreachable"));

        let err = ask(&AppConfig::new(None), &factory, "hello").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(factory.created.lock().unwrap().is_empty());
        assert!(factory.sent().is_empty());
    }

    #[tokio::test]
    async fn test_empty_prompt_still_sent() {
        let factory = StubFactory::new(Behavior::Answer("You asked nothing."));

        let result = ask(&config_with_key(), &factory, "").await.unwrap();

        assert_eq!(result, "You asked nothing.");
        assert_eq!(factory.sent().len(), 1);
        assert!(factory.sent()[0].prompt.is_empty());
    }

    #[tokio::test]
    async fn test_empty_answer_is_empty_response() {
        let factory = StubFactory::new(Behavior::Answer(""));

        let err = ask(&config_with_key(), &factory, "hello").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyResponse);
    }

    #[tokio::test]
    async fn test_submit_reports_transport_failure() {
        let factory = Arc::new(StubFactory::new(Behavior::Fail));
        let service = QueryService::new(Arc::new(config_with_key()), factory.clone());

        let err = service.submit("2+2=?").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(factory.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_survives_panicking_backend() {
        let factory = Arc::new(StubFactory::new(Behavior::Panic));
        let service = QueryService::new(Arc::new(config_with_key()), factory);

        let err = service.submit("boom").await.unwrap_err();

        assert!(matches!(err, Error::TaskFailed(_)));
        assert_eq!(err.kind(), ErrorKind::Transport);

        // The service keeps working after the failed task.
        let again = service.submit("still alive?").await.unwrap_err();
        assert!(matches!(again, Error::TaskFailed(_)));
    }
}
