//! Request-time enforcement of category protection.

use super::cookie::{auth_cookie_name, get_cookie};
use super::gate::{decide, is_valid_slug, match_category_path, normalize_path, GateDecision};
use super::session::validate_session_token;
use crate::config::Config;
use crate::error::AppError;
use crate::models::LookupFailurePolicy;
use crate::storage::ContentStore;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContentStore>,
    pub config: Arc<Config>,
}

/// Resolve whether a category is protected, applying the lookup failure policy.
pub async fn is_category_protected(state: &AppState, slug: &str) -> bool {
    match state.store.category_access(slug).await {
        Ok(Some(category)) => category.is_protected,
        Ok(None) => false,
        Err(e) => {
            let policy = state.config.lookup_failure_policy;
            tracing::warn!(
                action = "category_lookup_failed",
                category = %slug,
                policy = %policy,
                error = %e,
                "Category lookup failed"
            );
            policy == LookupFailurePolicy::Closed
        }
    }
}

/// Gate middleware for `/<root>/<slug>[/<subpath>]` routes.
///
/// Install with `axum::middleware::from_fn_with_state`. The path is matched in
/// canonical form. Requests outside the content root, and segments that are
/// not category slugs (`/blog/feed.xml`), pass straight through. Denials are
/// always redirects; responses for protected categories are marked
/// `private, no-store`.
pub async fn access_gate(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some(path) = normalize_path(request.uri().path()) else {
        return AppError::BadRequest("Malformed request path".to_string()).into_response();
    };
    let content_root = state.config.content_root.as_str();

    let Some(target) = match_category_path(&path, content_root) else {
        return next.run(request).await;
    };

    if !is_valid_slug(target.slug) {
        return next.run(request).await;
    }

    if !is_category_protected(&state, target.slug).await {
        return next.run(request).await;
    }

    let has_valid_token = get_cookie(request.headers(), &auth_cookie_name(target.slug))
        .is_some_and(|token| {
            validate_session_token(&token, target.slug, state.config.secret_bytes())
        });

    let mut response = match decide(&target, content_root, true, has_valid_token) {
        GateDecision::Allow => next.run(request).await,
        GateDecision::RedirectToLogin(location) => {
            tracing::debug!(action = "gate_redirect_login", category = %target.slug, path = %path, "Not authenticated");
            Redirect::to(&location).into_response()
        }
        GateDecision::RedirectToCategory(location) => {
            tracing::debug!(action = "gate_redirect_category", category = %target.slug, "Already authenticated");
            Redirect::to(&location).into_response()
        }
    };

    response.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("private, no-store"),
    );
    response
}
