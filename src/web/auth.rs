//! Session guard for the partner routes.
//!
//! Requests carry `Authorization: Bearer <token>`. Anything without a live
//! session is sent to the login page with a `redirect` parameter pointing back
//! at the page that was asked for.

use super::{AppState, error::ApiError};
use crate::core::{locale::Locale, session::resolve_session};
use axum::{
    extract::{Request, State},
    http::{HeaderMap, Uri, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

/// Bearer token from the `Authorization` header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Login page URL that returns to `uri` after signing in.
#[must_use]
pub fn login_redirect_target(locale: Locale, uri: &Uri) -> String {
    let back_to = uri
        .path_and_query()
        .map_or_else(|| uri.path(), |pq| pq.as_str());
    let query = serde_urlencoded::to_string([("redirect", back_to)]).unwrap_or_default();
    format!("/{}/plataforma-parceiro/login?{query}", locale.tag())
}

/// Middleware: resolves the session or redirects to login.
///
/// On success the [`crate::core::session::Session`] is available to handlers
/// as an `Extension`.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let locale = Locale::from_path(request.uri().path());

    let session = match bearer_token(request.headers()) {
        Some(token) => resolve_session(&state.db, token, state.now())
            .await
            .map_err(|e| ApiError::new(e, locale))?,
        None => None,
    };

    let Some(session) = session else {
        let target = login_redirect_target(locale, request.uri());
        tracing::debug!(path = %request.uri().path(), "no session, redirecting to login");
        return Ok(Redirect::to(&target).into_response());
    };

    tracing::debug!(partner_id = session.partner.id, "session resolved");
    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}
