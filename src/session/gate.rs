//! Session gate
//!
//! Middleware that admits only requests carrying a live authenticated
//! session cookie, and hands the handler an explicit `AuthContext`.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use log::debug;

use crate::server::AppState;

pub const SESSION_COOKIE: &str = "filevault_session";

/// Per-request proof of authentication, inserted by [`require_login`].
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub token: String,
    pub username: String,
}

/// Session token carried by the request, if any.
pub fn session_token(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

/// Cookie that binds the browser to `token`.
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .build()
}

/// Redirects to `/login` unless the session cookie maps to a logged-in session.
pub async fn require_login(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = session_token(&jar) {
        if let Some(username) = state.sessions.authenticate(&token).await {
            request
                .extensions_mut()
                .insert(AuthContext { token, username });
            return next.run(request).await;
        }
    }

    debug!(
        "Unauthenticated request to {} redirected to login",
        request.uri().path()
    );
    Redirect::to("/login").into_response()
}
