//! Login and logout handlers.

use axum::extract::{Extension, Form, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use log::{info, warn};
use serde::Deserialize;

use crate::auth::validate_login;
use crate::html::pages;
use crate::server::AppState;
use crate::session::{AuthContext, Flash, session_cookie, session_token};

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Renders the login form along with any pending flash messages.
pub async fn login_form(State(state): State<AppState>, jar: CookieJar) -> Html<String> {
    let pending = match session_token(&jar) {
        Some(token) => state.sessions.take_flashes(&token).await,
        None => Vec::new(),
    };
    Html(pages::login(&pending))
}

/// Validates the submitted credentials and starts a session on success.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> (CookieJar, Response) {
    let previous = session_token(&jar);

    match validate_login(
        &state.credentials,
        &form.username,
        &form.password,
        state.max_input_length,
    ) {
        Ok(username) => {
            let token = state.sessions.login(previous.as_deref(), &username).await;
            state
                .sessions
                .push_flash(&token, Flash::success("Login successful!"))
                .await;
            info!("User {} logged in", username);
            (
                jar.add(session_cookie(token)),
                Redirect::to("/").into_response(),
            )
        }
        Err(e) => {
            warn!("Login failed: {}", e);
            let mut pending = match previous {
                Some(token) => state.sessions.take_flashes(&token).await,
                None => Vec::new(),
            };
            pending.push(Flash::error("Invalid credentials!"));
            (jar, Html(pages::login(&pending)).into_response())
        }
    }
}

/// Ends the session and sends the browser back to the login form.
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    let token = state
        .sessions
        .logout(&auth.token, Flash::success("Successfully logged out!"))
        .await;
    info!("User {} logged out", auth.username);
    (jar.add(session_cookie(token)), Redirect::to("/login"))
}
