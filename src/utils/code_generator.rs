//! Short code generation and custom alias validation.
//!
//! Codes are derived from the URL itself: the same URL always maps to the
//! same code, across calls and across restarts. This is a cheap reproducible
//! mapping, not a collision-resistant one.

use crate::error::AppError;
use md5::{Digest, Md5};
use regex::Regex;
use std::sync::LazyLock;

/// Base-62 digits: `0-9`, then `A-Z`, then `a-z`.
const BASE62_ALPHABET: &[u8; 62] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Number of leading hex digits of the digest that feed the code.
const DIGEST_HEX_PREFIX: usize = 16;

/// Shortest configurable code length.
pub const MIN_CODE_LENGTH: usize = 4;

/// Longest configurable code length; a `u64` has at most 11 base-62 digits.
pub const MAX_CODE_LENGTH: usize = 11;

/// Paths that cannot be used as aliases because they collide with routes.
const RESERVED_ALIASES: &[&str] = &["api", "health"];

static ALIAS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]{4,20}$").unwrap_or_else(|e| panic!("invalid alias regex: {e}"))
});

/// Derives a short code of `length` base-62 characters from `original_url`.
///
/// The MD5 digest of the URL is hex encoded, its first 16 hex digits are read
/// as a 64-bit integer, and that integer is written in base 62, most
/// significant digit first. Longer encodings are truncated to `length`;
/// shorter ones are left-padded with `'0'`, which keeps the numeric value.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code("https://example.com/a/b", 7);
/// assert_eq!(code.len(), 7);
/// assert_eq!(code, generate_code("https://example.com/a/b", 7));
/// ```
pub fn generate_code(original_url: &str, length: usize) -> String {
    let digest = Md5::digest(original_url.as_bytes());
    let hex_digest = hex::encode(digest);

    // 16 hex digits always fit in a u64.
    let value = u64::from_str_radix(&hex_digest[..DIGEST_HEX_PREFIX], 16).unwrap_or_default();

    let mut encoded = to_base62(value);
    if encoded.len() < length {
        let padding = "0".repeat(length - encoded.len());
        encoded.insert_str(0, &padding);
    }
    encoded.truncate(length);
    encoded
}

/// Encodes `value` in base 62, most significant digit first.
fn to_base62(mut value: u64) -> String {
    if value == 0 {
        return (BASE62_ALPHABET[0] as char).to_string();
    }

    let mut digits = Vec::with_capacity(MAX_CODE_LENGTH);
    while value > 0 {
        digits.push(BASE62_ALPHABET[(value % 62) as usize]);
        value /= 62;
    }
    digits.reverse();

    digits.into_iter().map(char::from).collect()
}

/// Validates a caller-supplied custom alias.
///
/// # Rules
///
/// - Length: 4-20 characters
/// - Allowed characters: ASCII letters and digits
/// - Cannot equal a reserved route segment (exact match, routes are case-sensitive)
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_alias(alias: &str) -> Result<(), AppError> {
    if !ALIAS_REGEX.is_match(alias) {
        return Err(AppError::bad_request(
            "custom_alias must be 4-20 alphanumeric characters",
        ));
    }

    // Routes match case-sensitively, so only the exact segment is taken.
    if RESERVED_ALIASES.contains(&alias) {
        return Err(AppError::bad_request("This alias is reserved"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_base62(code: &str) -> bool {
        code.bytes().all(|b| b.is_ascii_alphanumeric())
    }

    #[test]
    fn test_generate_code_is_deterministic() {
        let url = "https://example.com/a/b";
        assert_eq!(generate_code(url, 7), generate_code(url, 7));
    }

    #[test]
    fn test_generate_code_has_requested_length() {
        for length in MIN_CODE_LENGTH..=MAX_CODE_LENGTH {
            let code = generate_code("https://example.com/a/b", length);
            assert_eq!(code.len(), length, "length {length}");
        }
    }

    #[test]
    fn test_generate_code_alphabet() {
        for i in 0..200 {
            let code = generate_code(&format!("https://example.com/page/{i}"), 7);
            assert!(is_base62(&code), "non base-62 code: {code}");
        }
    }

    #[test]
    fn test_shorter_codes_are_prefixes() {
        let url = "https://rust-lang.org";
        let long = generate_code(url, 11);
        let short = generate_code(url, 6);
        assert!(long.starts_with(&short));
    }

    #[test]
    fn test_different_urls_produce_different_codes() {
        let a = generate_code("https://example.com/1", 7);
        let b = generate_code("https://example.com/2", 7);
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_url_still_produces_code() {
        let code = generate_code("", 7);
        assert_eq!(code.len(), 7);
        assert!(is_base62(&code));
    }

    #[test]
    fn test_generate_code_matches_digest_prefix() {
        // md5("") = d41d8cd98f00b204e9800998ecf8427e
        let value = u64::from_str_radix("d41d8cd98f00b204", 16).unwrap();
        let expected = to_base62(value);
        assert_eq!(generate_code("", expected.len()), expected);
    }

    #[test]
    fn test_generate_code_known_values() {
        assert_eq!(generate_code("https://example.com/a/b", 7), "K3Zw7aE");
        assert_eq!(generate_code("https://example.com", 7), "HIg9QNo");
        assert_eq!(generate_code("https://rust-lang.org", 7), "6OwMJAi");
        assert_eq!(generate_code("", 7), "ID5IVGf");
    }

    #[test]
    fn test_generate_code_pads_short_encoding() {
        // md5 prefix 03c4a502d40e51b6 encodes to ten base-62 digits.
        assert_eq!(generate_code("https://example.com/a/b", 11), "0K3Zw7aEk0E");
        assert_eq!(generate_code("https://example.com", 11), "HIg9QNoQrwR");
    }

    #[test]
    fn test_to_base62_known_values() {
        assert_eq!(to_base62(0), "0");
        assert_eq!(to_base62(61), "z");
        assert_eq!(to_base62(62), "10");
        assert_eq!(to_base62(3843), "zz");
        assert_eq!(to_base62(u64::MAX).len(), MAX_CODE_LENGTH);
    }

    #[test]
    fn test_validate_accepts_alphanumeric_alias() {
        assert!(validate_custom_alias("promo2024").is_ok());
        assert!(validate_custom_alias("ABCD").is_ok());
        assert!(validate_custom_alias("a1b2c3d4e5f6g7h8i9j0").is_ok());
    }

    #[test]
    fn test_validate_rejects_short_alias() {
        let err = validate_custom_alias("abc").unwrap_err();
        assert!(err.to_string().contains("4-20"));
    }

    #[test]
    fn test_validate_rejects_long_alias() {
        assert!(validate_custom_alias("a1b2c3d4e5f6g7h8i9j0k").is_err());
    }

    #[test]
    fn test_validate_rejects_special_characters() {
        assert!(validate_custom_alias("my-link").is_err());
        assert!(validate_custom_alias("my_link").is_err());
        assert!(validate_custom_alias("my link").is_err());
    }

    #[test]
    fn test_validate_rejects_reserved_alias() {
        assert!(validate_custom_alias("health").is_err());
    }

    #[test]
    fn test_validate_reserved_check_is_case_sensitive() {
        assert!(validate_custom_alias("HEALTH").is_ok());
        assert!(validate_custom_alias("Health").is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_alias() {
        assert!(validate_custom_alias("").is_err());
    }
}
