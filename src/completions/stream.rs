//! Decoding of streamed chat completion events.

use futures::{StreamExt, stream};
use reqwest_eventsource::{Event, EventSource};
use serde::Deserialize;

use crate::core::{
    FragmentStream, LlmError, TextFragment,
    http::{event_stream_error, extract_error_message},
};

const DONE: &str = "[DONE]";

#[derive(Debug, Deserialize)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    content: Option<String>,
}

/// Meaning of one `data` payload in a streamed completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Fragment(TextFragment),
    /// A chunk without text, such as the role-only first delta or a usage report.
    Empty,
    Done,
}

/// Decode the `data` of one server-sent event.
///
/// An in-band `{"error": ..}` payload becomes [`LlmError::Api`], anything
/// that is not a chunk becomes [`LlmError::Parse`].
pub fn decode_event(data: &str) -> Result<StreamEvent, LlmError> {
    let data = data.trim();
    if data == DONE {
        return Ok(StreamEvent::Done);
    }

    let chunk: ChatCompletionChunk =
        serde_json::from_str(data).map_err(|e| LlmError::Parse {
            message: "Failed to parse streamed chunk".to_string(),
            source: Box::new(e),
        })?;

    if let Some(error) = chunk.error {
        let body = serde_json::json!({ "error": error }).to_string();
        return Err(LlmError::Api {
            message: format!("Stream error: {}", extract_error_message(&body)),
            status_code: None,
            source: None,
        });
    }

    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .filter(|text| !text.is_empty())
        .map_or(StreamEvent::Empty, |text| {
            StreamEvent::Fragment(TextFragment::new(text))
        }))
}

/// Lazily turn an opened event stream into text fragments.
///
/// Events are only read when the consumer asks for the next fragment. The
/// stream ends at `[DONE]` or when the body ends, and yields nothing after
/// its first error.
pub(crate) fn decode_fragments(events: EventSource) -> FragmentStream {
    Box::pin(stream::unfold(Some(events), |events| async move {
        let mut events = events?;

        while let Some(event) = events.next().await {
            let message = match event {
                Ok(Event::Open) => continue,
                Ok(Event::Message(message)) => message,
                Err(reqwest_eventsource::Error::StreamEnded) => return None,
                Err(e) => return Some((Err(event_stream_error(e)), None)),
            };

            match decode_event(&message.data) {
                Ok(StreamEvent::Fragment(fragment)) => return Some((Ok(fragment), Some(events))),
                Ok(StreamEvent::Empty) => {}
                Ok(StreamEvent::Done) => return None,
                Err(e) => return Some((Err(e), None)),
            }
        }

        None
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(content: &str) -> String {
        serde_json::json!({ "choices": [{ "index": 0, "delta": { "content": content } }] })
            .to_string()
    }

    #[test]
    fn content_delta_becomes_a_fragment() {
        assert_eq!(
            decode_event(&chunk("Hel")).unwrap(),
            StreamEvent::Fragment(TextFragment::new("Hel"))
        );
    }

    #[test]
    fn done_marker_ends_the_stream() {
        assert_eq!(decode_event("[DONE]").unwrap(), StreamEvent::Done);
        assert_eq!(decode_event(" [DONE]\n").unwrap(), StreamEvent::Done);
    }

    #[test]
    fn role_only_empty_and_usage_chunks_carry_no_text() {
        let chunks = [
            r#"{"choices":[{"index":0,"delta":{"role":"assistant"}}]}"#.to_string(),
            chunk(""),
            r#"{"choices":[{"index":0,"delta":{},"finish_reason":"stop"}]}"#.to_string(),
            r#"{"choices":[],"usage":{"prompt_tokens":1,"completion_tokens":1,"total_tokens":2}}"#
                .to_string(),
        ];

        for data in chunks {
            assert_eq!(decode_event(&data).unwrap(), StreamEvent::Empty, "{data}");
        }
    }

    #[test]
    fn malformed_payload_is_a_parse_error() {
        let err = decode_event("{not json").unwrap_err();
        assert!(matches!(err, LlmError::Parse { .. }));
    }

    #[test]
    fn in_band_error_payload_becomes_api_error() {
        match decode_event(r#"{"error":{"message":"overloaded"}}"#) {
            Err(LlmError::Api { message, .. }) => assert!(message.contains("overloaded")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn plain_string_error_payload_is_unwrapped() {
        let err = decode_event(r#"{"error":"model not loaded"}"#).unwrap_err();
        assert_eq!(err.to_string(), "API error: Stream error: model not loaded");
    }
}
