//! Access decisions for category routes.
//!
//! Protected content lives under `/<root>/<slug>[/<subpath>]`. This module
//! matches paths and decides what to do with a request once the category's
//! protection flag and token validity are known. It performs no I/O.
//!
//! Paths are matched in canonical form (see [`normalize_path`]), the same
//! form the static file server resolves, so `//blog/x`, `/blog//x` and
//! `/%62log/x` all name the category `x`.

use std::borrow::Cow;

/// A request path that targets a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryPath<'a> {
    pub slug: &'a str,
    /// Remainder after the slug, including its leading `/`. Empty for the category root.
    pub subpath: &'a str,
}

impl CategoryPath<'_> {
    /// Whether this is the category's login page.
    pub fn is_login(&self) -> bool {
        matches!(self.subpath, "/login" | "/login/")
    }
}

/// Outcome of the gate for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    RedirectToLogin(String),
    RedirectToCategory(String),
}

/// Canonicalize a request path.
///
/// Percent-decodes, drops empty and `.` segments, and resolves `..` against
/// the preceding segment (never above `/`). A trailing `/` is kept. Returns
/// `None` when the decoded path is not valid UTF-8.
pub fn normalize_path(path: &str) -> Option<String> {
    let decoded: Cow<'_, str> = urlencoding::decode(path).ok()?;

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    let mut normalized = format!("/{}", segments.join("/"));
    if !segments.is_empty() && decoded.ends_with('/') {
        normalized.push('/');
    }
    Some(normalized)
}

/// Match `/<root>/<slug>[/<subpath>]` against a canonical path.
///
/// The content root itself (`/<root>`, `/<root>/`) is not a category path.
pub fn match_category_path<'a>(path: &'a str, content_root: &str) -> Option<CategoryPath<'a>> {
    let rest = path.strip_prefix('/')?.strip_prefix(content_root)?;
    let rest = rest.strip_prefix('/')?;

    let (slug, subpath) = match rest.find('/') {
        Some(idx) => rest.split_at(idx),
        None => (rest, ""),
    };
    if slug.is_empty() {
        return None;
    }

    Some(CategoryPath { slug, subpath })
}

/// Slugs are URL-safe: ASCII alphanumerics, hyphens and underscores.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

pub fn root_url(content_root: &str) -> String {
    format!("/{}", content_root)
}

pub fn category_url(content_root: &str, slug: &str) -> String {
    format!("/{}/{}", content_root, slug)
}

pub fn login_url(content_root: &str, slug: &str) -> String {
    format!("/{}/{}/login", content_root, slug)
}

/// Decide the fate of a request to a category path.
pub fn decide(
    target: &CategoryPath<'_>,
    content_root: &str,
    is_protected: bool,
    has_valid_token: bool,
) -> GateDecision {
    if !is_protected {
        return GateDecision::Allow;
    }

    if target.is_login() {
        // Already authenticated: skip the login form
        if has_valid_token {
            return GateDecision::RedirectToCategory(category_url(content_root, target.slug));
        }
        return GateDecision::Allow;
    }

    if has_valid_token {
        GateDecision::Allow
    } else {
        GateDecision::RedirectToLogin(login_url(content_root, target.slug))
    }
}
