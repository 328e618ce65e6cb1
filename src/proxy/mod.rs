// Proxy module - isolates the upstream text-generation call

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Returned in place of model output when the provider answers without any text.
/// An empty string counts as no text, so `Some("")` is replaced too rather than
/// passed through as an empty `message`.
pub const EMPTY_RESPONSE_FALLBACK: &str = "No valid response received from model.";

/// Opaque upstream failure. `Display` is always the provider's original message,
/// which is what the error classifier inspects.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Transport-level failure (connect, TLS, body decode).
    #[error("{0}")]
    Http(String),
    /// Provider answered with a non-success status.
    #[error("{0}")]
    Upstream(String),
    /// Provider refused to produce text for the prompt.
    #[error("{0}")]
    Blocked(String),
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    #[error("{0}")]
    Other(String),
}

impl ProviderError {
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Http(err.to_string())
    }
}

/// One generative-AI backend. `Ok(None)` means the call succeeded but carried no usable text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(
        &self,
        api_key: &str,
        model: &str,
        prompt: &str,
    ) -> Result<Option<String>, ProviderError>;
}

/// Provider name -> adapter. Names match the supported-provider set in config.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    generators: HashMap<String, Arc<dyn TextGenerator>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, provider: impl Into<String>, generator: Arc<dyn TextGenerator>) -> Self {
        self.generators.insert(provider.into(), generator);
        self
    }

    pub fn get(&self, provider: &str) -> Option<Arc<dyn TextGenerator>> {
        self.generators.get(provider).cloned()
    }

    pub fn providers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.generators.keys().cloned().collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.providers())
            .finish()
    }
}

/// Wraps a [`TextGenerator`] call with the request timeout and the empty-response policy.
#[derive(Debug, Clone, Copy)]
pub struct ProviderAdapter {
    timeout: Duration,
}

impl ProviderAdapter {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn complete(
        &self,
        generator: &dyn TextGenerator,
        api_key: &str,
        model: &str,
        prompt: &str,
    ) -> Result<String, ProviderError> {
        let call = generator.generate(api_key, model, prompt);
        let output = match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result?,
            Err(_) => {
                tracing::warn!(
                    provider = generator.name(),
                    model,
                    "Provider call exceeded {:?}",
                    self.timeout
                );
                return Err(ProviderError::Timeout(self.timeout));
            }
        };

        match output {
            Some(text) if !text.is_empty() => Ok(text),
            _ => {
                tracing::warn!(provider = generator.name(), model, "Provider returned no text");
                Ok(EMPTY_RESPONSE_FALLBACK.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedGenerator {
        reply: Result<Option<String>, ProviderError>,
        delay: Duration,
    }

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn generate(
            &self,
            _api_key: &str,
            _model: &str,
            _prompt: &str,
        ) -> Result<Option<String>, ProviderError> {
            tokio::time::sleep(self.delay).await;
            self.reply.clone()
        }
    }

    fn fixed(reply: Result<Option<String>, ProviderError>) -> FixedGenerator {
        FixedGenerator {
            reply,
            delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_complete_returns_raw_text() {
        let adapter = ProviderAdapter::new(Duration::from_secs(1));
        let generator = fixed(Ok(Some("  안녕하세요\n".to_string())));
        let text = adapter.complete(&generator, "k", "m", "p").await.unwrap();
        assert_eq!(text, "  안녕하세요\n");
    }

    #[tokio::test]
    async fn test_complete_falls_back_on_missing_text() {
        let adapter = ProviderAdapter::new(Duration::from_secs(1));
        for reply in [None, Some(String::new())] {
            let generator = fixed(Ok(reply));
            let text = adapter.complete(&generator, "k", "m", "p").await.unwrap();
            assert_eq!(text, EMPTY_RESPONSE_FALLBACK);
        }
    }

    #[tokio::test]
    async fn test_complete_passes_failures_through() {
        let adapter = ProviderAdapter::new(Duration::from_secs(1));
        let generator = fixed(Err(ProviderError::Upstream("quota exceeded".to_string())));
        let err = adapter.complete(&generator, "k", "m", "p").await.unwrap_err();
        assert_eq!(err.message(), "quota exceeded");
    }

    #[tokio::test]
    async fn test_complete_times_out() {
        let adapter = ProviderAdapter::new(Duration::from_millis(20));
        let generator = FixedGenerator {
            reply: Ok(Some("late".to_string())),
            delay: Duration::from_millis(500),
        };
        let err = adapter.complete(&generator, "k", "m", "p").await.unwrap_err();
        assert_eq!(err, ProviderError::Timeout(Duration::from_millis(20)));
    }

    #[test]
    fn test_registry_lookup() {
        let registry = ProviderRegistry::new().register("Gemini", Arc::new(fixed(Ok(None))));
        assert!(registry.get("Gemini").is_some());
        assert!(registry.get("OpenAI").is_none());
        assert_eq!(registry.providers(), vec!["Gemini".to_string()]);
    }
}
