// ============================
// journal-backend/src/router.rs
// ============================
//! Explicit routing table and the axum router built from it.
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{Method, StatusCode},
    middleware::from_fn_with_state,
    routing::{get, post, MethodRouter},
    Router,
};
use tower_cookies::CookieManagerLayer;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::handlers::{auth, entries, health};
use crate::middleware::require_session;
use crate::AppState;

pub const INDEX_PATH: &str = "/";
pub const ADD_ENTRY_PATH: &str = "/add";
pub const REGISTER_PATH: &str = "/register";
pub const LOGIN_PATH: &str = "/login";
pub const LOGOUT_PATH: &str = "/logout";
pub const PING_PATH: &str = "/ping";

/// Every endpoint the server answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    RegisterForm,
    Register,
    LoginForm,
    Login,
    Logout,
    ListEntries,
    AddEntry,
    Ping,
}

impl Route {
    pub const ALL: [Route; 8] = [
        Route::RegisterForm,
        Route::Register,
        Route::LoginForm,
        Route::Login,
        Route::Logout,
        Route::ListEntries,
        Route::AddEntry,
        Route::Ping,
    ];

    pub fn method(self) -> Method {
        match self {
            Route::Register | Route::Login | Route::AddEntry => Method::POST,
            Route::RegisterForm
            | Route::LoginForm
            | Route::Logout
            | Route::ListEntries
            | Route::Ping => Method::GET,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Route::RegisterForm | Route::Register => REGISTER_PATH,
            Route::LoginForm | Route::Login => LOGIN_PATH,
            Route::Logout => LOGOUT_PATH,
            Route::ListEntries => INDEX_PATH,
            Route::AddEntry => ADD_ENTRY_PATH,
            Route::Ping => PING_PATH,
        }
    }

    /// Whether the session gate runs before the handler
    pub fn requires_session(self) -> bool {
        match self {
            Route::Logout | Route::ListEntries | Route::AddEntry => true,
            Route::RegisterForm | Route::Register | Route::LoginForm | Route::Login | Route::Ping => {
                false
            },
        }
    }

    /// Look up the route for a method and path
    pub fn resolve(method: &Method, path: &str) -> Option<Route> {
        Route::ALL
            .into_iter()
            .find(|route| route.method() == *method && route.path() == path)
    }

    fn handler(self) -> MethodRouter<Arc<AppState>> {
        match self {
            Route::RegisterForm => get(auth::register_form),
            Route::Register => post(auth::register),
            Route::LoginForm => get(auth::login_form),
            Route::Login => post(auth::login),
            Route::Logout => get(auth::logout),
            Route::ListEntries => get(entries::index),
            Route::AddEntry => post(entries::add),
            Route::Ping => get(health::ping),
        }
    }
}

/// Requests running past `timeout` are answered with 408
fn timeout_layer(timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout)
}

/// Build the application router from [`Route::ALL`]
pub fn create_router(state: Arc<AppState>) -> Router {
    let mut public = Router::new();
    let mut protected = Router::new();

    for route in Route::ALL {
        if route.requires_session() {
            protected = protected.route(route.path(), route.handler());
        } else {
            public = public.route(route.path(), route.handler());
        }
    }

    let protected = protected.route_layer(from_fn_with_state(state.clone(), require_session));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(timeout_layer(state.settings.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
