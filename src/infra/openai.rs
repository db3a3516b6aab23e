use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::services::GenerationService;

const COMPLETIONS_URL: &str = "https://api.openai.com/v1/completions";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Completion-endpoint client backing the generation seam. One attempt per
/// prompt; the output length bound is fixed at construction.
pub struct OpenAiClient {
    http: Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    endpoint: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, model: String, max_tokens: u32) -> AppResult<Self> {
        Self::with_endpoint(api_key, model, max_tokens, COMPLETIONS_URL.to_string())
    }

    pub fn with_endpoint(
        api_key: String,
        model: String,
        max_tokens: u32,
        endpoint: String,
    ) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| AppError::Configuration(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            http,
            api_key,
            model,
            max_tokens,
            endpoint,
        })
    }
}

#[async_trait]
impl GenerationService for OpenAiClient {
    async fn complete(&self, prompt: &str) -> AppResult<String> {
        let request = CompletionRequest {
            model: &self.model,
            prompt,
            max_tokens: self.max_tokens,
        };

        debug!(model = %self.model, prompt_bytes = prompt.len(), "requesting completion");
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| AppError::Generation(format!("failed to call completion API: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::Generation(format!(
                "completion API responded with {status}: {body}"
            )));
        }

        let payload: CompletionResponse = response.json().await.map_err(|err| {
            AppError::Generation(format!("failed to parse completion response: {err}"))
        })?;

        first_completion(payload)
    }
}

/// A response with no usable completion is an error; an empty report body
/// must never reach the recipient's mailbox.
fn first_completion(response: CompletionResponse) -> AppResult<String> {
    let text = response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.text)
        .ok_or_else(|| AppError::Generation("response contained no completion".to_string()))?;

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::Generation("completion text was empty".to_string()));
    }
    Ok(trimmed.to_string())
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_the_first_choice_and_trims_it() {
        let response: CompletionResponse = serde_json::from_str(
            r#"{"choices": [{"text": "\n\nHello, team.\n"}, {"text": "second"}]}"#,
        )
        .unwrap();
        assert_eq!(first_completion(response).unwrap(), "Hello, team.");
    }

    #[test]
    fn zero_choices_is_a_generation_error() {
        let response: CompletionResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(
            first_completion(response),
            Err(AppError::Generation(_))
        ));
    }

    #[test]
    fn blank_completion_is_a_generation_error() {
        let response: CompletionResponse =
            serde_json::from_str(r#"{"choices": [{"text": "  \n "}]}"#).unwrap();
        assert!(matches!(
            first_completion(response),
            Err(AppError::Generation(_))
        ));
    }
}
