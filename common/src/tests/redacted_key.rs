use crate::RedactedApiKey;

/// **VALUE**: Verifies that the token never appears in Debug or Display output.
///
/// **WHY THIS MATTERS**: The remote data source config is logged at startup. A leaked
/// bearer token in a log file is a credential leak.
#[test]
fn given_token_when_formatted_then_value_is_hidden() {
    let key = RedactedApiKey::new(String::from("secret-token-123"));

    let debug = format!("{key:?}");
    let display = format!("{key}");

    assert!(!debug.contains("secret-token-123"));
    assert!(!display.contains("secret-token-123"));
    assert_eq!(key.as_str(), "secret-token-123");
    assert_eq!(key.len(), 16);
}

#[test]
fn given_token_when_serialized_then_fails() {
    let key = RedactedApiKey::new(String::from("secret"));

    let result = serde_json::to_string(&key);

    assert!(result.is_err(), "Tokens must refuse serialization");
}

#[test]
fn given_unset_env_var_when_reading_token_then_none() {
    let key = RedactedApiKey::from_env("REPOSITORY_TEST_TOKEN_THAT_IS_NEVER_SET");

    assert!(key.is_none());
}
