//! Route handlers for the category login write path.

pub mod auth;

use crate::auth::gate::is_valid_slug;
use crate::auth::middleware::AppState;
use crate::error::AppError;
use axum::{routing::post, Router};

/// Validate that a path segment is a category slug.
pub fn validate_slug(slug: &str) -> Result<(), AppError> {
    if !is_valid_slug(slug) {
        return Err(AppError::BadRequest("Invalid category".to_string()));
    }
    Ok(())
}

/// Build the login/logout router under `/<content_root>`.
pub fn gate_router(content_root: &str) -> Router<AppState> {
    Router::new()
        .route(
            &format!("/{}/{{category}}/login", content_root),
            post(auth::login),
        )
        .route(
            &format!("/{}/{{category}}/logout", content_root),
            post(auth::logout),
        )
}
