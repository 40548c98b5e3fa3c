// ============================
// crates/backend-lib/src/handlers/entries.rs
// ============================
//! Journal listing and entry creation. Both sit behind the session gate.
use std::sync::Arc;

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use journal_common::{EntryForm, UserId};

use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::router::INDEX_PATH;
use crate::{templates, AppState};

async fn render_journal(
    state: &AppState,
    user: UserId,
    error: Option<&str>,
) -> Result<String, AppError> {
    let entries = state.entries.list_for(user).await?;
    let username = state
        .credentials
        .username(user)
        .await?
        .ok_or_else(|| AppError::Internal(format!("session bound to unknown user {user}")))?;
    Ok(templates::journal_page(&username, &entries, error))
}

/// GET /
pub async fn index(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Html<String>, AppError> {
    Ok(Html(render_journal(&state, user, None).await?))
}

/// POST /add
pub async fn add(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Form(form): Form<EntryForm>,
) -> Result<Response, AppError> {
    match state.entries.add(user, &form.content).await {
        Ok(_) => Ok(Redirect::to(INDEX_PATH).into_response()),
        Err(e @ AppError::Validation(_)) => {
            let page = render_journal(&state, user, Some(&e.sanitized_message())).await?;
            Ok((e.status_code(), Html(page)).into_response())
        },
        Err(e) => Err(e),
    }
}
