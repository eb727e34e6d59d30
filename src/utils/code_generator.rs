//! Short code generation and validation utilities.

use crate::error::AppError;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;
use uuid::Uuid;

/// Length of a system-generated code.
pub const GENERATED_CODE_LENGTH: usize = 6;

/// Maximum length of a caller-supplied code.
pub const MAX_CUSTOM_CODE_LENGTH: usize = 32;

/// Key of the global redirect counter in the links namespace.
pub const HIT_COUNTER_KEY: &str = "counter";

/// Codes that cannot be used as short links.
///
/// Covers the service's own path segments and the hit counter key, which
/// shares the links namespace.
const RESERVED_CODES: &[&str] = &["api", "health", HIT_COUNTER_KEY];

static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("custom code pattern is valid"));

/// Generates a random short code.
///
/// Takes the leading segment of a random UUID v4, producing a
/// 6-character lowercase hex token. Collisions are not retried here; the
/// caller checks the store before committing.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code();
/// assert_eq!(code.len(), 6);
/// ```
pub fn generate_code() -> String {
    let mut code = Uuid::new_v4().simple().to_string();
    code.truncate(GENERATED_CODE_LENGTH);
    code
}

/// Returns true if the code collides with a reserved key or path segment.
pub fn is_reserved_code(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

/// Validates a caller-supplied custom short code.
///
/// # Rules
///
/// - Length: 1-32 characters
/// - Allowed characters: ASCII letters, digits, `-` and `_`
/// - Cannot be a reserved code
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if code.is_empty() || code.len() > MAX_CUSTOM_CODE_LENGTH {
        return Err(AppError::bad_request(
            "Custom short must be 1-32 characters",
            json!({ "provided_length": code.len() }),
        ));
    }

    if !CUSTOM_CODE_REGEX.is_match(code) {
        return Err(AppError::bad_request(
            "Custom short can only contain letters, digits, '-' and '_'",
            json!({ "customShort": code }),
        ));
    }

    if is_reserved_code(code) {
        return Err(AppError::bad_request(
            "This custom short is reserved",
            json!({ "customShort": code }),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_code_has_correct_length() {
        assert_eq!(generate_code().len(), GENERATED_CODE_LENGTH);
    }

    #[test]
    fn test_generate_code_is_lowercase_hex() {
        let code = generate_code();
        assert!(code.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_generate_code_is_random() {
        let codes: HashSet<String> = (0..100).map(|_| generate_code()).collect();
        assert!(codes.len() > 90);
    }

    #[test]
    fn test_generated_code_is_never_reserved() {
        for _ in 0..1000 {
            assert!(!is_reserved_code(&generate_code()));
        }
    }

    #[test]
    fn test_validate_single_character() {
        assert!(validate_custom_code("a").is_ok());
    }

    #[test]
    fn test_validate_maximum_length() {
        assert!(validate_custom_code(&"a".repeat(32)).is_ok());
    }

    #[test]
    fn test_validate_too_long() {
        let result = validate_custom_code(&"a".repeat(33));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("1-32 characters"));
    }

    #[test]
    fn test_validate_empty_string() {
        assert!(validate_custom_code("").is_err());
    }

    #[test]
    fn test_validate_mixed_case_and_separators() {
        assert!(validate_custom_code("My_Link-2024").is_ok());
    }

    #[test]
    fn test_validate_rejects_path_characters() {
        assert!(validate_custom_code("a/b").is_err());
        assert!(validate_custom_code("a?b").is_err());
        assert!(validate_custom_code("my code").is_err());
    }

    #[test]
    fn test_validate_all_reserved_codes() {
        for &reserved in RESERVED_CODES {
            let result = validate_custom_code(reserved);
            assert!(
                result.is_err(),
                "Reserved code '{}' should be invalid",
                reserved
            );
        }
    }

    #[test]
    fn test_hit_counter_key_is_reserved() {
        assert!(is_reserved_code(HIT_COUNTER_KEY));
    }
}
