//! Per-category auth cookies.
//!
//! Each protected category gets its own cookie, `blog_auth_<slug>`, so a
//! session for one category never shadows another.

use super::session::TOKEN_MAX_AGE_SECS;
use axum::http::{header, HeaderMap};

pub const AUTH_COOKIE_PREFIX: &str = "blog_auth";

/// Cookie name for a category.
pub fn auth_cookie_name(category_slug: &str) -> String {
    format!("{}_{}", AUTH_COOKIE_PREFIX, category_slug)
}

/// Find a cookie value by name across all `Cookie` headers.
///
/// Values may themselves contain `=`; only the first one splits name from value.
pub fn get_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value carrying a fresh session token.
pub fn auth_cookie(category_slug: &str, token: &str, secure: bool) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}{}",
        auth_cookie_name(category_slug),
        token,
        TOKEN_MAX_AGE_SECS,
        if secure { "; Secure" } else { "" }
    )
}

/// `Set-Cookie` value telling the browser to drop the category's cookie.
pub fn clear_auth_cookie(category_slug: &str, secure: bool) -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0{}",
        auth_cookie_name(category_slug),
        if secure { "; Secure" } else { "" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(cookies: &[&str]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for c in cookies {
            headers.append(header::COOKIE, HeaderValue::from_str(c).unwrap());
        }
        headers
    }

    #[test]
    fn test_cookie_name_is_per_category() {
        assert_eq!(auth_cookie_name("secret-cat"), "blog_auth_secret-cat");
        assert_ne!(auth_cookie_name("a"), auth_cookie_name("b"));
    }

    #[test]
    fn test_get_cookie_parses_header() {
        let headers = headers_with(&["theme=dark;  blog_auth_cat=abc==def ; other=1"]);
        assert_eq!(
            get_cookie(&headers, "blog_auth_cat").as_deref(),
            Some("abc==def")
        );
        assert_eq!(get_cookie(&headers, "theme").as_deref(), Some("dark"));
        assert_eq!(get_cookie(&headers, "blog_auth_other"), None);
    }

    #[test]
    fn test_get_cookie_does_not_match_prefix() {
        let headers = headers_with(&["blog_auth_cat-2=abc"]);
        assert_eq!(get_cookie(&headers, "blog_auth_cat"), None);
    }

    #[test]
    fn test_get_cookie_across_multiple_headers() {
        let headers = headers_with(&["a=1", "blog_auth_cat=tok"]);
        assert_eq!(get_cookie(&headers, "blog_auth_cat").as_deref(), Some("tok"));
    }

    #[test]
    fn test_get_cookie_ignores_garbage() {
        let headers = headers_with(&[";;novalue; =orphan; blog_auth_cat="]);
        assert_eq!(get_cookie(&headers, "blog_auth_cat"), None);
        assert_eq!(get_cookie(&HeaderMap::new(), "blog_auth_cat"), None);
    }

    #[test]
    fn test_auth_cookie_attributes() {
        let cookie = auth_cookie("cat", "tok", true);
        assert!(cookie.starts_with("blog_auth_cat=tok;"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(cookie.ends_with("; Secure"));

        assert!(!auth_cookie("cat", "tok", false).contains("Secure"));
    }

    #[test]
    fn test_clear_auth_cookie() {
        let cookie = clear_auth_cookie("cat", false);
        assert!(cookie.starts_with("blog_auth_cat=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
