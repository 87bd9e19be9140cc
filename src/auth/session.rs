//! Stateless, category-scoped session tokens.
//!
//! A token is `base64url("<slug>:<issued_at_ms>:<hex hmac>")` where the HMAC
//! is HMAC-SHA256 keyed by the server secret over `"<slug>:<issued_at_ms>"`.
//! Nothing is stored server-side: validity depends only on the token bytes,
//! the expected slug, the secret and the clock.

use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

type HmacSha256 = Hmac<Sha256>;

/// Maximum token age: 7 days, in milliseconds.
pub const TOKEN_MAX_AGE_MS: u64 = 7 * 24 * 60 * 60 * 1000;

/// Cookie lifetime matching [`TOKEN_MAX_AGE_MS`], in seconds.
pub const TOKEN_MAX_AGE_SECS: u64 = TOKEN_MAX_AGE_MS / 1000;

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn compute_tag(payload: &str, secret: &[u8]) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret).expect("HMAC-SHA256 accepts keys of any length");
    mac.update(payload.as_bytes());
    mac
}

/// Create a session token for `category_slug`, issued now.
pub fn create_session_token(category_slug: &str, secret: &[u8]) -> String {
    create_session_token_at(category_slug, secret, now_millis())
}

/// Create a session token with an explicit issue time.
pub fn create_session_token_at(category_slug: &str, secret: &[u8], issued_at_ms: u64) -> String {
    let payload = format!("{}:{}", category_slug, issued_at_ms);
    let tag = hex::encode(compute_tag(&payload, secret).finalize().into_bytes());
    general_purpose::URL_SAFE_NO_PAD.encode(format!("{}:{}", payload, tag))
}

/// Validate a session token against the expected category, using the current time.
///
/// Returns `false` for anything other than a well-formed, untampered,
/// unexpired token issued for exactly `category_slug`.
pub fn validate_session_token(token: &str, category_slug: &str, secret: &[u8]) -> bool {
    validate_session_token_at(token, category_slug, secret, now_millis())
}

/// Validate a session token against an explicit clock reading.
pub fn validate_session_token_at(
    token: &str,
    category_slug: &str,
    secret: &[u8],
    now_ms: u64,
) -> bool {
    let Ok(decoded) = general_purpose::URL_SAFE_NO_PAD.decode(token.trim()) else {
        return false;
    };
    let Ok(decoded) = String::from_utf8(decoded) else {
        return false;
    };

    // Split from the right: the tag and timestamp never contain ':'.
    let mut parts = decoded.rsplitn(3, ':');
    let (Some(tag_hex), Some(timestamp), Some(slug)) = (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    if slug.is_empty() || slug != category_slug {
        return false;
    }

    if timestamp.is_empty() || !timestamp.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let Ok(issued_at_ms) = timestamp.parse::<u64>() else {
        return false;
    };

    let Ok(tag) = hex::decode(tag_hex) else {
        return false;
    };

    // verify_slice compares in constant time
    let payload = format!("{}:{}", slug, timestamp);
    if compute_tag(&payload, secret).verify_slice(&tag).is_err() {
        return false;
    }

    match now_ms.checked_sub(issued_at_ms) {
        Some(age) => age <= TOKEN_MAX_AGE_MS,
        // Issued in the future
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"an-unguessable-test-secret-of-32-bytes!";

    #[test]
    fn test_fresh_token_is_valid() {
        let token = create_session_token("secret-cat", SECRET);
        assert!(validate_session_token(&token, "secret-cat", SECRET));
    }

    #[test]
    fn test_token_is_cookie_safe() {
        let token = create_session_token("secret-cat", SECRET);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_cross_category_replay_fails() {
        let token = create_session_token("secret-cat", SECRET);
        assert!(!validate_session_token(&token, "other-cat", SECRET));
        assert!(!validate_session_token(&token, "secret-ca", SECRET));
        assert!(!validate_session_token(&token, "", SECRET));
    }

    #[test]
    fn test_wrong_secret_fails() {
        let token = create_session_token("secret-cat", SECRET);
        assert!(!validate_session_token(
            &token,
            "secret-cat",
            b"a-different-secret-also-32-bytes-long"
        ));
    }

    #[test]
    fn test_expiry_boundaries() {
        let now = 1_700_000_000_000;

        let one_second_ago = create_session_token_at("c", SECRET, now - 1000);
        assert!(validate_session_token_at(&one_second_ago, "c", SECRET, now));

        let exactly_max = create_session_token_at("c", SECRET, now - TOKEN_MAX_AGE_MS);
        assert!(validate_session_token_at(&exactly_max, "c", SECRET, now));

        let too_old = create_session_token_at("c", SECRET, now - TOKEN_MAX_AGE_MS - 1);
        assert!(!validate_session_token_at(&too_old, "c", SECRET, now));
    }

    #[test]
    fn test_future_token_fails() {
        let now = 1_700_000_000_000;
        let future = create_session_token_at("c", SECRET, now + 1);
        assert!(!validate_session_token_at(&future, "c", SECRET, now));
    }

    #[test]
    fn test_edited_timestamp_fails() {
        let now = 1_700_000_000_000;
        let old = create_session_token_at("c", SECRET, now - TOKEN_MAX_AGE_MS - 10);
        let decoded =
            String::from_utf8(general_purpose::URL_SAFE_NO_PAD.decode(&old).unwrap()).unwrap();
        let tag = decoded.rsplit(':').next().unwrap();
        let forged = general_purpose::URL_SAFE_NO_PAD.encode(format!("c:{}:{}", now, tag));
        assert!(!validate_session_token_at(&forged, "c", SECRET, now));
    }

    #[test]
    fn test_unsigned_legacy_token_fails() {
        // Old tokens were just base64("<slug>:<timestamp>")
        let legacy = general_purpose::STANDARD.encode(format!("c:{}", now_millis()));
        assert!(!validate_session_token(&legacy, "c", SECRET));
    }

    #[test]
    fn test_slug_containing_colon() {
        let token = create_session_token("odd:slug", SECRET);
        assert!(validate_session_token(&token, "odd:slug", SECRET));
        assert!(!validate_session_token(&token, "slug", SECRET));
    }

    #[test]
    fn test_malformed_input_never_panics() {
        let encoded = |raw: &[u8]| general_purpose::URL_SAFE_NO_PAD.encode(raw);
        let cases: Vec<String> = vec![
            String::new(),
            " ".to_string(),
            "not base64 !!!".to_string(),
            "====".to_string(),
            "YQ".to_string(),
            "authenticated".to_string(),
            encoded(b"c"),
            encoded(b"c:"),
            encoded(b"c::"),
            encoded(b"c:123:"),
            encoded(b"c:-5:abcd"),
            encoded(b"c:99999999999999999999999:ab"),
            encoded(b"c:123:zz-not-hex"),
            encoded(&[0xff, 0xfe, 0x3a]),
        ];
        for case in &cases {
            assert!(
                !validate_session_token(case, "c", SECRET),
                "accepted {:?}",
                case
            );
        }
    }
}
