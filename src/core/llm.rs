use tracing::debug;

use super::{
    error::LlmError,
    traits::ChatProvider,
    types::{CompletionResponse, Message},
};

/// Send `messages` to `model` through `provider`.
///
/// With `streaming` off this waits for the whole answer. With it on, the
/// returned stream yields fragments as the service produces them. Validating
/// the conversation is left to the provider.
pub async fn request_completion<P>(
    provider: &P,
    model: &str,
    messages: &[Message],
    streaming: bool,
) -> Result<CompletionResponse, LlmError>
where
    P: ChatProvider + ?Sized,
{
    debug!(model, streaming, messages = messages.len(), "Requesting completion");

    if streaming {
        provider
            .stream(model, messages)
            .await
            .map(CompletionResponse::Streaming)
    } else {
        provider
            .complete(model, messages)
            .await
            .map(CompletionResponse::Complete)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use futures::{StreamExt, stream};

    use super::*;
    use crate::core::{Completion, FragmentStream, TextFragment};

    struct EchoProvider;

    #[async_trait]
    impl ChatProvider for EchoProvider {
        async fn complete(
            &self,
            model: &str,
            messages: &[Message],
        ) -> Result<Completion, LlmError> {
            Ok(Completion {
                id: "echo".to_string(),
                model: model.to_string(),
                content: messages.last().map(|m| m.content.clone()).unwrap_or_default(),
                finish_reason: Some("stop".to_string()),
                usage: None,
            })
        }

        async fn stream(
            &self,
            _model: &str,
            messages: &[Message],
        ) -> Result<FragmentStream, LlmError> {
            let words: Vec<Result<TextFragment, LlmError>> = messages
                .iter()
                .flat_map(|m| m.content.split_whitespace())
                .map(|word| Ok(TextFragment::new(word)))
                .collect();
            Ok(Box::pin(stream::iter(words)))
        }
    }

    #[tokio::test]
    async fn blocking_request_returns_whole_completion() {
        let response = request_completion(&EchoProvider, "m", &[Message::user("hi there")], false)
            .await
            .unwrap();

        match response {
            CompletionResponse::Complete(completion) => {
                assert_eq!(completion.content, "hi there");
                assert_eq!(completion.model, "m");
            }
            CompletionResponse::Streaming(_) => panic!("expected a complete response"),
        }
    }

    #[tokio::test]
    async fn streaming_request_yields_fragments_in_order() {
        let response = request_completion(&EchoProvider, "m", &[Message::user("a b c")], true)
            .await
            .unwrap();

        let CompletionResponse::Streaming(fragments) = response else {
            panic!("expected a stream");
        };
        let texts: Vec<String> = fragments.map(|f| f.unwrap().text).collect().await;
        assert_eq!(texts, vec!["a", "b", "c"]);
    }
}
