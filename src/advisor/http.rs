//! HTTP advisor for OpenAI-compatible chat completion endpoints.

use super::prompts;
use super::{
    PlayAdvisor, SuggestPlayRequest, SuggestPlayResponse, SummarizePlaybookRequest,
    SummarizePlaybookResponse,
};
use crate::config::AdvisorConfig;
use crate::error::AiServiceError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
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
    message: ChatMessage,
}

/// Advisor that sends prompts to a chat completions endpoint and expects JSON replies.
pub struct HttpAdvisor {
    /// Chat completions URL
    endpoint: String,
    api_key: Option<String>,
    model: String,
    /// HTTP client
    http_client: reqwest::Client,
}

impl HttpAdvisor {
    pub fn new(config: &AdvisorConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Sends one prompt and decodes the reply's JSON payload into `T`.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - the request cannot be sent
    /// - the endpoint answers with a non-success status
    /// - the reply is not a chat completion carrying a `T` as JSON
    async fn complete<T: DeserializeOwned>(&self, prompt: String) -> Result<T, AiServiceError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        log::debug!("sending advisor request to {}", self.endpoint);
        let mut request = self.http_client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request
            .send()
            .await
            .map_err(|e| AiServiceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AiServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| AiServiceError::Transport(e.to_string()))?;
        parse_completion(&text)
    }
}

/// Extracts the first choice's content and decodes it as `T`.
fn parse_completion<T: DeserializeOwned>(raw: &str) -> Result<T, AiServiceError> {
    let chat: ChatResponse = serde_json::from_str(raw).map_err(|e| invalid(e.to_string()))?;
    let content = chat
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| invalid("no choices in reply"))?;
    serde_json::from_str(strip_code_fence(&content))
        .map_err(|e| invalid(format!("{e}: {content}")))
}

fn invalid(reason: impl Into<String>) -> AiServiceError {
    AiServiceError::InvalidResponse(reason.into())
}

/// Models sometimes wrap JSON in a markdown fence.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

fn require_text(field: &str, value: &str) -> Result<(), AiServiceError> {
    if value.trim().is_empty() {
        return Err(invalid(format!("`{field}` is empty")));
    }
    Ok(())
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl PlayAdvisor for HttpAdvisor {
    async fn suggest_play(
        &self,
        request: SuggestPlayRequest,
    ) -> Result<SuggestPlayResponse, AiServiceError> {
        let prompt = format!(
            "{}\n\n{}",
            prompts::suggest_play_prompt(&request.opponent_formation),
            prompts::SUGGEST_PLAY_OUTPUT
        );
        let response: SuggestPlayResponse = self.complete(prompt).await?;
        require_text("suggestedPlay", &response.suggested_play)?;
        require_text("rationale", &response.rationale)?;
        log::info!("advisor suggested {:?}", response.suggested_play);
        Ok(response)
    }

    async fn summarize_playbook(
        &self,
        request: SummarizePlaybookRequest,
    ) -> Result<SummarizePlaybookResponse, AiServiceError> {
        let prompt = format!(
            "{}\n\n{}",
            prompts::summarize_playbook_prompt(&request.playbook_content),
            prompts::SUMMARIZE_PLAYBOOK_OUTPUT
        );
        let response: SummarizePlaybookResponse = self.complete(prompt).await?;
        require_text("summary", &response.summary)?;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completion(content: &str) -> String {
        serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        })
        .to_string()
    }

    #[test]
    fn parses_json_content() {
        let content = r#"{"suggestedPlay":"Mesh","rationale":"Beats man coverage"}"#;
        let raw = completion(content);
        let parsed: SuggestPlayResponse = parse_completion(&raw).unwrap();
        assert_eq!(parsed.suggested_play, "Mesh");
    }

    #[test]
    fn parses_fenced_content() {
        let raw = completion("```json\n{\"summary\":\"Run heavy\"}\n```");
        let parsed: SummarizePlaybookResponse = parse_completion(&raw).unwrap();
        assert_eq!(parsed.summary, "Run heavy");
    }

    #[test]
    fn rejects_missing_fields_and_empty_choices() {
        let raw = completion(r#"{"suggestedPlay":"Mesh"}"#);
        assert!(matches!(
            parse_completion::<SuggestPlayResponse>(&raw),
            Err(AiServiceError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_completion::<SummarizePlaybookResponse>(r#"{"choices":[]}"#),
            Err(AiServiceError::InvalidResponse(_))
        ));
    }

    #[test]
    fn blank_fields_are_invalid() {
        assert!(require_text("summary", "  ").is_err());
        assert!(require_text("summary", "ok").is_ok());
    }

    #[test]
    fn request_body_shape() {
        let body = ChatRequest {
            model: "gpt-4o-mini",
            messages: vec![ChatMessage {
                role: "user".into(),
                content: "hi".into(),
            }],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json["response_format"]["type"], "json_object");
        assert_eq!(json["messages"][0]["role"], "user");
    }
}
