//! Login and logout endpoints for protected categories.

use super::validate_slug;
use crate::auth::cookie::{auth_cookie, clear_auth_cookie};
use crate::auth::gate::{category_url, login_url, root_url};
use crate::auth::middleware::AppState;
use crate::auth::session::create_session_token;
use crate::auth::verify::verify_password;
use crate::error::AppError;
use crate::models::LoginForm;
use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
    Form,
};

/// POST /{root}/{category}/login — Check the category password and issue a session cookie
pub async fn login(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    validate_slug(&category)?;
    let root = state.config.content_root.as_str();

    // Fetch with verifier; nothing to log into for missing or public categories
    let stored = match state.store.category(&category).await? {
        Some(stored) if stored.is_protected => stored,
        _ => return Ok(Redirect::to(&category_url(root, &category)).into_response()),
    };

    let verifier = stored
        .password_hash
        .as_deref()
        .filter(|h| !h.trim().is_empty())
        .ok_or_else(|| {
            AppError::Internal(format!(
                "Protected category '{}' has no password verifier",
                category
            ))
        })?;

    if !verify_password(&form.password, verifier)? {
        tracing::warn!(action = "login_failed", category = %category, "Invalid category password");
        let target = format!("{}?error=1", login_url(root, &category));
        return Ok(Redirect::to(&target).into_response());
    }

    let token = create_session_token(&category, state.config.secret_bytes());
    let cookie = auth_cookie(&category, &token, state.config.secure_cookies);

    tracing::info!(action = "login_success", category = %category, "Category unlocked");

    Ok((
        [(header::SET_COOKIE, cookie)],
        Redirect::to(&category_url(root, &category)),
    )
        .into_response())
}

/// POST /{root}/{category}/logout — Drop the category's session cookie
pub async fn logout(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Response, AppError> {
    validate_slug(&category)?;

    let cookie = clear_auth_cookie(&category, state.config.secure_cookies);

    tracing::info!(action = "logout", category = %category, "Category session cleared");

    Ok((
        [(header::SET_COOKIE, cookie)],
        Redirect::to(&root_url(&state.config.content_root)),
    )
        .into_response())
}
