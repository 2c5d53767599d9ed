use async_trait::async_trait;

use super::{
    error::LlmError,
    types::{Completion, FragmentStream, Message},
};

/// A backend that can answer chat conversations.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send the conversation and wait for the whole answer.
    async fn complete(&self, model: &str, messages: &[Message]) -> Result<Completion, LlmError>;

    /// Send the conversation and return the answer as it is generated.
    async fn stream(&self, model: &str, messages: &[Message])
    -> Result<FragmentStream, LlmError>;
}
