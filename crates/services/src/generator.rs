use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GenerationError;
use crate::prompt::QuizPrompt;

/// Turns a prompt into raw quiz JSON text.
#[async_trait]
pub trait QuizGenerator: Send + Sync {
    /// # Errors
    ///
    /// Returns `GenerationError` when the service is disabled, the request fails,
    /// or the response carries no content.
    async fn generate(&self, prompt: &QuizPrompt) -> Result<String, GenerationError>;
}

#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl GeneratorConfig {
    /// Reads `QUIZ_AI_API_KEY` (falling back to `OPENAI_API_KEY`),
    /// `QUIZ_AI_BASE_URL` and `QUIZ_AI_MODEL`. `None` without a key.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("QUIZ_AI_API_KEY")
            .or_else(|_| env::var("OPENAI_API_KEY"))
            .ok()?;
        Self::from_parts(
            api_key,
            env::var("QUIZ_AI_BASE_URL").ok(),
            env::var("QUIZ_AI_MODEL").ok(),
        )
    }

    /// Build a config, applying defaults for missing base URL and model.
    #[must_use]
    pub fn from_parts(
        api_key: String,
        base_url: Option<String>,
        model: Option<String>,
    ) -> Option<Self> {
        if api_key.trim().is_empty() {
            return None;
        }
        Some(Self {
            base_url: base_url.unwrap_or_else(|| "https://api.openai.com/v1".into()),
            api_key,
            model: model.unwrap_or_else(|| "gpt-4o-mini".into()),
            temperature: 0.7,
            max_tokens: 1500,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// `QuizGenerator` backed by an OpenAI-compatible chat-completions endpoint.
#[derive(Clone)]
pub struct OpenAiQuizGenerator {
    client: Client,
    config: Option<GeneratorConfig>,
}

impl OpenAiQuizGenerator {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(GeneratorConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<GeneratorConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }
}

#[async_trait]
impl QuizGenerator for OpenAiQuizGenerator {
    async fn generate(&self, prompt: &QuizPrompt) -> Result<String, GenerationError> {
        let config = self.config.as_ref().ok_or(GenerationError::Disabled)?;

        let payload = ChatRequest {
            model: &config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        };

        debug!(model = %config.model, "requesting quiz generation");
        let response = self
            .client
            .post(config.completions_url())
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GenerationError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)?;

        Ok(content.trim().to_string())
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_key_disables_generation() {
        assert!(GeneratorConfig::from_parts("  ".into(), None, None).is_none());
    }

    #[test]
    fn defaults_and_url_join() {
        let config =
            GeneratorConfig::from_parts("key".into(), Some("http://localhost:8080/v1/".into()), None)
                .unwrap();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.completions_url(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn request_asks_for_json_object() {
        let payload = ChatRequest {
            model: "m",
            messages: vec![ChatMessage {
                role: "user",
                content: "hi",
            }],
            response_format: ResponseFormat {
                kind: "json_object",
            },
            temperature: 0.7,
            max_tokens: 1500,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["response_format"]["type"], "json_object");
        assert_eq!(value["max_tokens"], 1500);
    }

    #[tokio::test]
    async fn disabled_generator_fails_fast() {
        let generator = OpenAiQuizGenerator::new(None);
        assert!(!generator.enabled());
        let prompt = QuizPrompt {
            system: String::new(),
            user: String::new(),
        };
        let err = generator.generate(&prompt).await.unwrap_err();
        assert!(matches!(err, GenerationError::Disabled));
    }
}
