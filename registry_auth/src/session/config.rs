use std::sync::LazyLock;

pub static SESSION_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("SESSION_COOKIE_NAME")
        .ok()
        .unwrap_or("registry_session".to_string())
});

pub static SESSION_COOKIE_MAX_AGE: LazyLock<u64> = LazyLock::new(|| {
    std::env::var("SESSION_COOKIE_MAX_AGE")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(7200) // Default to 2 hours if not set or invalid
});

/// Anti-forgery cookie. Must stay readable by client-side code, which
/// echoes it back in [`XSRF_HEADER_NAME`] on state-changing requests.
pub static XSRF_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("XSRF_COOKIE_NAME")
        .ok()
        .unwrap_or("XSRF-TOKEN".to_string())
});

pub const XSRF_HEADER_NAME: &str = "X-XSRF-TOKEN";
