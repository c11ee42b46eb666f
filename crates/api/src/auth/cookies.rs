//! Refresh-token cookie helpers.
//!
//! The refresh token travels only in an HTTP-only cookie; it is never part
//! of a JSON response body.

use axum::http::HeaderMap;

/// Cookie name carrying the opaque refresh token.
pub const REFRESH_COOKIE: &str = "refresh_token";

/// Build the `Set-Cookie` value issuing a refresh token.
pub fn build_refresh_cookie(token: &str, max_age_secs: i64) -> String {
    format!("{REFRESH_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age_secs}")
}

/// Build the `Set-Cookie` value that expires the refresh token.
pub fn clear_refresh_cookie() -> String {
    format!("{REFRESH_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
}

/// Extract a cookie value by name from the request headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookies = headers.get(axum::http::header::COOKIE)?.to_str().ok()?;
    for pair in cookies.split(';') {
        if let Some((key, value)) = pair.trim().split_once('=') {
            if key == name {
                return Some(value.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::COOKIE;

    #[test]
    fn issued_cookie_is_http_only_with_max_age() {
        let cookie = build_refresh_cookie("tok-123", 259_200);
        assert!(cookie.starts_with("refresh_token=tok-123;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=259200"));
    }

    #[test]
    fn cleared_cookie_expires_immediately() {
        let cookie = clear_refresh_cookie();
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn cookie_value_finds_named_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            "theme=dark; refresh_token=abc123; lang=en".parse().unwrap(),
        );
        assert_eq!(
            cookie_value(&headers, REFRESH_COOKIE).as_deref(),
            Some("abc123")
        );
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn cookie_value_handles_absent_header() {
        let headers = HeaderMap::new();
        assert_eq!(cookie_value(&headers, REFRESH_COOKIE), None);
    }
}
