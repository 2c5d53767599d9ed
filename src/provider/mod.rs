mod config;
pub(crate) mod constants;
mod env;
pub(crate) mod openai;
mod resolver;

pub use config::{Registry, RegistryBuilder, ServiceConfig};
pub use env::StartupCredentials;
pub use openai::{ChatClient, ChatConfig};
pub use resolver::{ResolvedService, ask_model, resolve_client};
