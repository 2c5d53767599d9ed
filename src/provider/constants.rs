pub const CHAT_COMPLETIONS_ENDPOINT: &str = "/chat/completions";

pub mod openai {
    pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
    pub const API_BASE: &str = "https://api.openai.com/v1";
    pub const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";
}

pub mod gemini {
    pub const SERVICE_NAME: &str = "gemini";
    pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
    pub const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
    pub const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";
}

pub mod ollama {
    pub const DEFAULT_MODEL: &str = "qwen3";
    pub const API_BASE: &str = "http://localhost:11434/v1";
    /// Ollama ignores the key but OpenAI-style clients must send one.
    pub const API_KEY: &str = "ollama";
}
