// ============================
// crates/backend-lib/src/handlers/auth.rs
// ============================
//! Register, login and logout.
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use journal_common::CredentialsForm;
use serde::Deserialize;
use tower_cookies::Cookies;
use zeroize::Zeroize;

use crate::error::AppError;
use crate::middleware::session::{clear_session_cookie, session_cookie, session_token, CurrentUser};
use crate::router::{INDEX_PATH, LOGIN_PATH};
use crate::{templates, AppState};

/// Shown on the login page after a successful registration
pub const REGISTERED_NOTICE: &str = "Account created, please log in";

#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    #[serde(default)]
    registered: Option<String>,
}

/// GET /register
pub async fn register_form() -> Html<String> {
    Html(templates::register_page(None))
}

/// POST /register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Form(mut form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    let result = state
        .credentials
        .register(&form.username, &form.password)
        .await;
    form.password.zeroize();

    match result {
        Ok(_) => Ok(Redirect::to(&format!("{LOGIN_PATH}?registered=1")).into_response()),
        Err(e) if e.is_user_facing() => {
            let page = templates::register_page(Some(&e.sanitized_message()));
            Ok((e.status_code(), Html(page)).into_response())
        },
        Err(e) => Err(e),
    }
}

/// GET /login
pub async fn login_form(Query(query): Query<LoginQuery>) -> Html<String> {
    let notice = query.registered.as_ref().map(|_| REGISTERED_NOTICE);
    Html(templates::login_page(None, notice))
}

/// POST /login
pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Form(mut form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    let verified = state
        .credentials
        .verify(&form.username, &form.password)
        .await;
    form.password.zeroize();

    match verified? {
        Some(user) => {
            if let Some(previous) = session_token(&cookies) {
                state.sessions.end(&previous).await?;
            }
            let token = state.sessions.start(user).await?;
            cookies.add(session_cookie(token, &state.settings));
            Ok(Redirect::to(INDEX_PATH).into_response())
        },
        None => {
            let err = AppError::InvalidCredentials;
            let page = templates::login_page(Some(&err.sanitized_message()), None);
            Ok((err.status_code(), Html(page)).into_response())
        },
    }
}

/// GET /logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    cookies: Cookies,
) -> Result<Redirect, AppError> {
    if let Some(token) = session_token(&cookies) {
        state.sessions.end(&token).await?;
    }
    clear_session_cookie(&cookies);
    tracing::info!(user_id = %user, "logged out");
    Ok(Redirect::to(LOGIN_PATH))
}
