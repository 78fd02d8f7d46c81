mod client;
pub(crate) mod types;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::AiError;
use crate::traits::{Message, TextGenerator};

use client::GeminiClient;
use types::*;

// =============================================================================
// Gemini Agent
// =============================================================================

#[derive(Clone)]
pub struct Gemini {
    api_key: String,
    pub(crate) model: String,
    base_url: Option<String>,
    timeout: Option<Duration>,
    temperature: Option<f32>,
    json_output: bool,
}

impl Gemini {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
            timeout: None,
            temperature: None,
            json_output: false,
        }
    }

    pub fn from_env(model: impl Into<String>) -> Result<Self, AiError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| AiError::Config("GEMINI_API_KEY environment variable not set".into()))?;
        Ok(Self::new(api_key, model))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Per-request HTTP timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Ask the model for `application/json` output.
    pub fn json_output(mut self) -> Self {
        self.json_output = true;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub(crate) fn client(&self) -> Result<GeminiClient, AiError> {
        let client = GeminiClient::new(&self.api_key, self.timeout)?;
        Ok(match self.base_url {
            Some(ref url) => client.with_base_url(url),
            None => client,
        })
    }

    fn generation_config(&self) -> Option<GenerationConfig> {
        if self.temperature.is_none() && !self.json_output {
            return None;
        }
        Some(GenerationConfig {
            temperature: self.temperature,
            max_output_tokens: None,
            response_mime_type: self.json_output.then(|| "application/json".to_string()),
        })
    }
}

// =============================================================================
// TextGenerator Implementation
// =============================================================================

#[async_trait]
impl TextGenerator for Gemini {
    async fn generate(&self, messages: Vec<Message>) -> Result<String, AiError> {
        let mut request = GenerateRequest::from_messages(messages);
        if let Some(config) = self.generation_config() {
            request = request.generation_config(config);
        }

        let response = self.client()?.generate(&self.model, &request).await?;

        response.text().ok_or_else(|| {
            AiError::EmptyResponse(format!(
                "no text from Gemini (finish reason: {})",
                response.finish_reason().unwrap_or("unknown")
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_new() {
        let ai = Gemini::new("g-test", "gemini-1.5-flash");
        assert_eq!(ai.model(), "gemini-1.5-flash");
        assert_eq!(ai.api_key, "g-test");
        assert!(ai.generation_config().is_none());
    }

    #[test]
    fn test_gemini_builders() {
        let ai = Gemini::new("g-test", "gemini-1.5-flash")
            .with_base_url("http://localhost:9999")
            .with_timeout(Duration::from_secs(5))
            .with_temperature(0.1)
            .json_output();
        assert_eq!(ai.base_url.as_deref(), Some("http://localhost:9999"));
        assert_eq!(ai.timeout, Some(Duration::from_secs(5)));

        let config = ai.generation_config().unwrap();
        assert_eq!(config.temperature, Some(0.1));
        assert_eq!(config.response_mime_type.as_deref(), Some("application/json"));
    }

    #[test]
    fn test_unreachable_endpoint_is_transient() {
        let ai = Gemini::new("g-test", "gemini-1.5-flash")
            .with_base_url("http://127.0.0.1:1")
            .with_timeout(Duration::from_secs(2));
        let rt = tokio::runtime::Runtime::new().unwrap();
        let err = rt.block_on(ai.complete("ping")).unwrap_err();
        assert!(err.is_transient());
    }
}
