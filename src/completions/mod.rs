//! Wire types for the OpenAI-compatible `/chat/completions` endpoint.

pub(crate) mod request;
pub(crate) mod response;
pub mod stream;

pub(crate) use request::build_request;
pub(crate) use response::ChatCompletionResponse;
pub(crate) use stream::decode_fragments;
pub use stream::{StreamEvent, decode_event};
