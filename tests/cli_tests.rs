use std::{
    path::PathBuf,
    process::{Command, Output},
};

/// An empty working directory so no `.env` file is picked up.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("llm-gate-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

fn llm_gate(name: &str, envs: &[(&str, &str)], args: &[&str]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_llm-gate"));
    command
        .current_dir(scratch_dir(name))
        .env_remove("OPENAI_API_KEY")
        .env_remove("GEMINI_API_KEY")
        .env_remove("LLM_GATE_MODEL")
        .env_remove("RUST_LOG")
        .envs(envs.iter().copied())
        .args(args);

    command.output().expect("run llm-gate")
}

#[test]
fn missing_credential_is_reported_in_plain_words() {
    let output = llm_gate("no-keys", &[("GEMINI_API_KEY", "gm-1")], &["What is a closure?"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(
        stderr.contains("OPENAI_API_KEY not found in environment variables"),
        "{stderr}"
    );
    assert!(!stderr.contains("Environment {"), "{stderr}");
    assert!(output.stdout.is_empty());
}

#[test]
fn unknown_model_is_reported_in_plain_words() {
    let output = llm_gate(
        "unknown-model",
        &[("OPENAI_API_KEY", "sk-1"), ("GEMINI_API_KEY", "gm-1")],
        &["--model", "claude-9", "What is a closure?"],
    );
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(
        stderr.contains("Configuration error: Unknown model: claude-9"),
        "{stderr}"
    );
    assert!(!stderr.contains("UnknownService"), "{stderr}");
}

#[test]
fn list_shows_registered_services_in_order() {
    let output = llm_gate(
        "list",
        &[("OPENAI_API_KEY", "sk-1"), ("GEMINI_API_KEY", "gm-1")],
        &["--list"],
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    let names: Vec<&str> = stdout
        .lines()
        .filter_map(|line| line.split('\t').next())
        .collect();

    assert!(output.status.success());
    assert_eq!(names, vec!["gpt-4o-mini", "gemini", "qwen3"]);
    assert!(!stdout.contains("sk-1"));
}
