//! Session gate for protected routes and the session cookie.
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use journal_common::UserId;
use metrics::counter;
use tower_cookies::{
    cookie::{time::Duration as CookieDuration, SameSite},
    Cookie, Cookies,
};

use crate::auth::SessionToken;
use crate::config::Settings;
use crate::error::AppError;
use crate::metrics::SESSION_REJECTED;
use crate::AppState;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "journal_session";

/// Identity resolved by [`require_session`], available to protected handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub UserId);

/// Token presented by the client, if any
pub fn session_token(cookies: &Cookies) -> Option<SessionToken> {
    cookies
        .get(SESSION_COOKIE)
        .map(|cookie| SessionToken::new(cookie.value()))
}

/// Cookie handed out after a successful login
pub fn session_cookie(token: SessionToken, settings: &Settings) -> Cookie<'static> {
    let max_age = i64::try_from(settings.session_ttl_secs).unwrap_or(i64::MAX);
    Cookie::build((SESSION_COOKIE, token.into_inner()))
        .path("/")
        .http_only(true)
        .secure(settings.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(max_age))
        .build()
}

/// Tell the browser to drop the session cookie
pub fn clear_session_cookie(cookies: &Cookies) {
    cookies.remove(Cookie::build(SESSION_COOKIE).path("/").build());
}

/// Access-control gate.
///
/// Resolves the session cookie and either inserts [`CurrentUser`] into the
/// request extensions or redirects to the login page without running the
/// handler.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = match session_token(&cookies) {
        Some(token) => {
            let user = state.sessions.resolve(&token).await?;
            if user.is_none() {
                clear_session_cookie(&cookies);
            }
            user
        },
        None => None,
    };

    let Some(user) = user else {
        counter!(SESSION_REJECTED).increment(1);
        tracing::debug!(path = %request.uri().path(), "no valid session, redirecting to login");
        return Err(AppError::Unauthenticated);
    };

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}
