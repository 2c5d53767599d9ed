//! # llm-gate
//!
//! Resolve a named model service to a ready-to-use OpenAI-compatible chat
//! client, then ask it for a whole answer or stream one to the console.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use llm_gate::{CompletionResponse, Message, Registry, ServiceConfig, ask_model, print_stream};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = Registry::builder()
//!         .service(
//!             ServiceConfig::new("qwen3")
//!                 .with_api_key("ollama")
//!                 .with_base_url("http://localhost:11434/v1"),
//!         )
//!         .build();
//!
//!     let messages = vec![
//!         Message::system("You are a patient teacher."),
//!         Message::user("What does `yield from` do in Python?"),
//!     ];
//!
//!     if let CompletionResponse::Streaming(fragments) =
//!         ask_model(&registry, "qwen3", &messages, true).await?
//!     {
//!         print_stream(fragments, &mut std::io::stdout()).await;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Configuration faults (unknown service, missing credential, malformed
//! endpoint) are reported when a client is resolved, not when the
//! [`Registry`] is built.

pub mod completions;
pub mod console;
pub mod core;
pub mod provider;

pub use crate::console::{StreamOutcome, print_stream};
pub use crate::core::{
    ChatProvider, ChatRole, Completion, CompletionResponse, ConfigurationError, FragmentStream,
    HttpClientConfig, LanguageModelUsage, LlmError, Message, TextFragment, request_completion,
};
pub use crate::provider::{
    ChatClient, ChatConfig, Registry, RegistryBuilder, ResolvedService, ServiceConfig,
    StartupCredentials, ask_model, resolve_client,
};
