use serde::Serialize;

use crate::core::{ChatRole, LlmError, Message};

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<RequestMessage>,
    pub stream: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestRole {
    System,
    User,
    Assistant,
}

impl From<ChatRole> for RequestRole {
    fn from(role: ChatRole) -> Self {
        match role {
            ChatRole::System => RequestRole::System,
            ChatRole::User => RequestRole::User,
            ChatRole::Assistant => RequestRole::Assistant,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RequestMessage {
    pub role: RequestRole,
    pub content: String,
}

/// Build the wire request, rejecting conversations the API would refuse anyway.
pub fn build_request(
    model: &str,
    messages: &[Message],
    stream: bool,
) -> Result<ChatCompletionRequest, LlmError> {
    if model.trim().is_empty() {
        return Err(LlmError::Request(
            "Missing model. Make sure to specify a model identifier.".to_string(),
        ));
    }

    if messages.is_empty() {
        return Err(LlmError::Request(
            "Missing messages. Make sure to add at least one message.".to_string(),
        ));
    }

    let messages = messages
        .iter()
        .map(|m| RequestMessage {
            role: m.role.into(),
            content: m.content.clone(),
        })
        .collect();

    Ok(ChatCompletionRequest {
        model: model.to_string(),
        messages,
        stream,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_role_tagged_messages_in_order() {
        let request = build_request(
            "qwen3",
            &[Message::system("be brief"), Message::user("hi")],
            true,
        )
        .unwrap();

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "qwen3",
                "messages": [
                    { "role": "system", "content": "be brief" },
                    { "role": "user", "content": "hi" }
                ],
                "stream": true
            })
        );
    }

    #[test]
    fn empty_conversation_is_rejected() {
        let err = build_request("gpt-4o-mini", &[], false).unwrap_err();
        assert!(matches!(err, LlmError::Request(message) if message.contains("Missing messages")));
    }

    #[test]
    fn blank_model_is_rejected() {
        let err = build_request("  ", &[Message::user("hi")], false).unwrap_err();
        assert!(matches!(err, LlmError::Request(_)));
    }
}
