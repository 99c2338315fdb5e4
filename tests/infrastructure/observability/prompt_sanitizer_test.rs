use kuching::infrastructure::observability::sanitize_prompt;

#[test]
fn given_empty_prompt_when_sanitizing_then_returns_empty_marker() {
    assert_eq!(sanitize_prompt(""), "[EMPTY]");
    assert_eq!(sanitize_prompt("   "), "[EMPTY]");
}

#[test]
fn given_short_prompt_when_sanitizing_then_returns_unchanged() {
    let prompt = "What is the powerhouse of the cell?";
    assert_eq!(sanitize_prompt(prompt), prompt);
}

#[test]
fn given_long_prompt_when_sanitizing_then_truncates_with_length() {
    let prompt = "a".repeat(150);
    let result = sanitize_prompt(&prompt);
    assert!(result.starts_with(&"a".repeat(100)));
    assert!(result.contains("... (150 chars total)"));
}

#[test]
fn given_multibyte_prompt_when_sanitizing_then_truncates_on_character_boundary() {
    let prompt = "é".repeat(150);
    let result = sanitize_prompt(&prompt);
    assert!(result.starts_with(&"é".repeat(100)));
    assert!(result.contains("(150 chars total)"));
}

#[test]
fn given_bearer_token_when_sanitizing_then_redacts_token() {
    let prompt = "Authorization: Bearer sk-abc123xyz";
    let result = sanitize_prompt(prompt);
    assert!(result.contains("Bearer [REDACTED]"));
    assert!(!result.contains("sk-abc123xyz"));
}

#[test]
fn given_api_key_when_sanitizing_then_redacts_key() {
    let prompt = "Send request with api_key=secret123";
    let result = sanitize_prompt(prompt);
    assert!(result.contains("api_key=[REDACTED]"));
    assert!(!result.contains("secret123"));
}

#[test]
fn given_password_when_sanitizing_then_redacts_password() {
    let prompt = "Login with password=hunter2";
    let result = sanitize_prompt(prompt);
    assert!(result.contains("password=[REDACTED]"));
    assert!(!result.contains("hunter2"));
}

#[test]
fn given_repeated_credentials_when_sanitizing_then_redacts_every_occurrence() {
    let prompt = "token=one and later token=two";
    let result = sanitize_prompt(prompt);
    assert!(!result.contains("one"));
    assert!(!result.contains("two"));
    assert_eq!(result.matches("[REDACTED]").count(), 2);
}

#[test]
fn given_whitespace_padded_prompt_when_sanitizing_then_trims() {
    let prompt = "  Hello world  ";
    assert_eq!(sanitize_prompt(prompt), "Hello world");
}
