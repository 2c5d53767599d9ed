//! Non-streamed `/chat/completions` response.
//!
//! Fields the crate does not surface are still deserialized when cheap so that
//! the shape stays close to the API contract.

use serde::Deserialize;

use crate::core::{Completion, LanguageModelUsage, LlmError};

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    #[allow(dead_code)]
    #[serde(default)]
    pub index: u32,
    pub message: ResponseMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    /// This is always `assistant`
    #[allow(dead_code)]
    pub role: Option<String>,
    pub content: Option<String>,
    /// Present instead of `content` when the model declines to answer.
    pub refusal: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TryFrom<ChatCompletionResponse> for Completion {
    type Error = LlmError;

    fn try_from(res: ChatCompletionResponse) -> Result<Self, Self::Error> {
        let choice = res.choices.into_iter().next().ok_or_else(|| LlmError::Api {
            message: "No choices in response".to_string(),
            status_code: None,
            source: None,
        })?;

        let content = match (choice.message.content, choice.message.refusal) {
            (Some(content), _) => content,
            (None, Some(refusal)) => {
                return Err(LlmError::Api {
                    message: format!("Model refused: {refusal}"),
                    status_code: None,
                    source: None,
                });
            }
            (None, None) => String::new(),
        };

        Ok(Completion {
            id: res.id,
            model: res.model,
            content,
            finish_reason: choice.finish_reason,
            usage: res.usage.map(|usage| LanguageModelUsage {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
                total_tokens: usage.total_tokens,
            }),
        })
    }
}
