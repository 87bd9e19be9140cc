//! Request models and content-store documents.
//!
//! Category documents mirror the CMS schema (`blogCategory`). Only the
//! fields the gate and the login path need are deserialized.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Content Store Models
// ============================================================================

/// Public projection of a category, as read by the access gate.
///
/// Never carries the password verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAccess {
    pub slug: String,
    #[serde(default)]
    pub is_protected: bool,
}

/// Full category document, including the stored password verifier.
///
/// Only fetched on the login path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub slug: String,
    #[serde(default)]
    pub is_protected: bool,
    /// SHA-256 hex digest or Argon2 PHC string.
    #[serde(default)]
    pub password_hash: Option<String>,
}

impl Category {
    pub fn access(&self) -> CategoryAccess {
        CategoryAccess {
            slug: self.slug.clone(),
            is_protected: self.is_protected,
        }
    }
}

// ============================================================================
// Auth Models
// ============================================================================

/// Login form submission.
///
/// The password is wiped from memory when the form is dropped.
#[derive(Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct LoginForm {
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("password", &"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Gate Policy
// ============================================================================

/// What the gate does when the category lookup itself fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupFailurePolicy {
    /// Treat the category as public (availability first).
    #[default]
    Open,
    /// Treat the category as protected (access control first).
    Closed,
}

impl LookupFailurePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupFailurePolicy::Open => "open",
            LookupFailurePolicy::Closed => "closed",
        }
    }
}

impl std::fmt::Display for LookupFailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LookupFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(LookupFailurePolicy::Open),
            "closed" => Ok(LookupFailurePolicy::Closed),
            _ => Err(format!("Invalid lookup failure policy: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_access_from_cms_json() {
        let json = r#"{"_id":"abc","slug":"secret-cat","title":"Secret","isProtected":true}"#;
        let access: CategoryAccess = serde_json::from_str(json).unwrap();
        assert_eq!(access.slug, "secret-cat");
        assert!(access.is_protected);
    }

    #[test]
    fn test_missing_protection_flag_is_public() {
        let access: CategoryAccess = serde_json::from_str(r#"{"slug":"notes"}"#).unwrap();
        assert!(!access.is_protected);
    }

    #[test]
    fn test_category_with_verifier() {
        let json = r#"{"slug":"s","isProtected":true,"passwordHash":"abcd"}"#;
        let category: Category = serde_json::from_str(json).unwrap();
        assert_eq!(category.password_hash.as_deref(), Some("abcd"));
        assert_eq!(
            category.access(),
            CategoryAccess {
                slug: "s".to_string(),
                is_protected: true
            }
        );
    }

    #[test]
    fn test_login_form_debug_redacts_password() {
        let form = LoginForm {
            password: "hunter2".to_string(),
        };
        let debug = format!("{:?}", form);
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!(
            "open".parse::<LookupFailurePolicy>(),
            Ok(LookupFailurePolicy::Open)
        );
        assert_eq!(
            " Closed ".parse::<LookupFailurePolicy>(),
            Ok(LookupFailurePolicy::Closed)
        );
        assert!("maybe".parse::<LookupFailurePolicy>().is_err());
        assert_eq!(LookupFailurePolicy::default(), LookupFailurePolicy::Open);
    }
}
