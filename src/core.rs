pub mod error;
pub mod http;
pub mod llm;
pub mod traits;
pub mod types;

pub use error::{ConfigurationError, LlmError};
pub use http::{HttpClient, HttpClientConfig};
pub use llm::request_completion;
pub use traits::ChatProvider;
pub use types::{
    ChatRole, Completion, CompletionResponse, FragmentStream, LanguageModelUsage, Message,
    TextFragment,
};
