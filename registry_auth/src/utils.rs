use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use http::header::{HeaderMap, SET_COOKIE};
use ring::rand::SecureRandom;

use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum UtilError {
    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Cookie error: {0}")]
    Cookie(String),
}

/// Generate a url-safe random string from `len` bytes of entropy.
pub fn gen_random_string(len: usize) -> Result<String, UtilError> {
    let rng = ring::rand::SystemRandom::new();
    let mut bytes = vec![0u8; len];
    rng.fill(&mut bytes)
        .map_err(|_| UtilError::Crypto("Failed to generate random string".to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Generate a lowercase hex random string from `len` bytes of entropy.
///
/// Bearer tokens use hex rather than base64url so the presented token
/// survives naive clients that strip `-`/`_`.
pub(crate) fn gen_random_hex(len: usize) -> Result<String, UtilError> {
    let rng = ring::rand::SystemRandom::new();
    let mut bytes = vec![0u8; len];
    rng.fill(&mut bytes)
        .map_err(|_| UtilError::Crypto("Failed to generate random token".to_string()))?;
    Ok(hex_encode(&bytes))
}

pub(crate) fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Append a Set-Cookie header. `http_only = false` is reserved for the
/// CSRF cookie, which client-side code must be able to read back.
/// `max_age = None` emits a browser-session cookie with no expiry.
pub(crate) fn header_set_cookie<'a>(
    headers: &'a mut HeaderMap,
    name: &str,
    value: &str,
    max_age: Option<i64>,
    http_only: bool,
) -> Result<&'a HeaderMap, UtilError> {
    let http_only_attr = if http_only { " HttpOnly;" } else { "" };
    let max_age_attr = match max_age {
        Some(secs) => format!(" Max-Age={secs};"),
        None => String::new(),
    };
    let cookie = format!("{name}={value}; SameSite=Lax;{http_only_attr}{max_age_attr} Path=/");
    tracing::trace!("Set-Cookie: {}", cookie);
    headers.append(
        SET_COOKIE,
        cookie
            .parse()
            .map_err(|_| UtilError::Cookie("Failed to parse cookie".to_string()))?,
    );
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gen_random_string_length_and_uniqueness() {
        // 32 bytes of entropy encode to 43 base64url characters
        let a = gen_random_string(32).expect("random string");
        let b = gen_random_string(32).expect("random string");
        assert_eq!(a.len(), 43);
        assert_ne!(a, b);
    }

    #[test]
    fn test_gen_random_hex_is_hex() {
        let token = gen_random_hex(40).expect("random hex");
        assert_eq!(token.len(), 80);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hex_encode() {
        assert_eq!(hex_encode(&[0x00, 0xff, 0x0a]), "00ff0a");
    }

    #[test]
    fn test_header_set_cookie_http_only() {
        let mut headers = HeaderMap::new();
        header_set_cookie(&mut headers, "sid", "abc", Some(600), true).expect("set cookie");
        let cookie = headers.get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with("sid=abc;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=600"));
    }

    #[test]
    fn test_header_set_cookie_readable() {
        let mut headers = HeaderMap::new();
        header_set_cookie(&mut headers, "XSRF-TOKEN", "tok", Some(7200), false)
            .expect("set cookie");
        let cookie = headers.get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(!cookie.contains("HttpOnly"));
    }

    #[test]
    fn test_header_set_cookie_without_max_age() {
        let mut headers = HeaderMap::new();
        header_set_cookie(&mut headers, "XSRF-TOKEN", "tok", None, false).expect("set cookie");
        let cookie = headers.get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(!cookie.contains("Max-Age"));
        assert!(cookie.ends_with("Path=/"));
    }

    #[test]
    fn test_header_set_cookie_appends() {
        let mut headers = HeaderMap::new();
        header_set_cookie(&mut headers, "a", "1", Some(60), true).expect("set cookie");
        header_set_cookie(&mut headers, "b", "2", Some(60), false).expect("set cookie");
        assert_eq!(headers.get_all(SET_COOKIE).iter().count(), 2);
    }

    proptest::proptest! {
        /// Any byte slice hex-encodes to twice its length, lowercase hex only
        #[test]
        fn test_hex_encode_shape(bytes in proptest::collection::vec(0u8..=255, 0..64)) {
            let hex = hex_encode(&bytes);
            proptest::prop_assert_eq!(hex.len(), bytes.len() * 2);
            proptest::prop_assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }

        /// Cookie values from our generators always produce a parseable header
        #[test]
        fn test_header_set_cookie_accepts_token_charset(
            value in "[a-zA-Z0-9_-]{1,80}",
            max_age in -86400i64..=604800,
        ) {
            let mut headers = HeaderMap::new();
            header_set_cookie(&mut headers, "sid", &value, Some(max_age), true)
                .expect("set cookie");
            let cookie = headers.get(SET_COOKIE).unwrap().to_str().unwrap();
            let expected_prefix = format!("sid={value};");
            let expected_max_age = format!("Max-Age={max_age}");
            proptest::prop_assert!(cookie.starts_with(&expected_prefix));
            proptest::prop_assert!(cookie.contains(&expected_max_age));
        }
    }
}
