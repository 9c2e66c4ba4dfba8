//! Session cookie middleware.
//!
//! Reads the `sessionId` cookie, minting a new id when it is missing or
//! implausible, and stores the resolved [`SessionId`] in the request
//! extensions for handlers to extract with `Extension<SessionId>`.

use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use qrify_core::SessionId;
use std::sync::Arc;
use tracing::debug;

pub const SESSION_COOKIE: &str = "sessionId";

pub const SESSION_MAX_AGE_DAYS: i64 = 30;

pub async fn assign_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let existing = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| SessionId::parse(cookie.value()));

    let (session, minted) = match existing {
        Some(session) => (session, false),
        None => (SessionId::generate(), true),
    };

    request.extensions_mut().insert(session.clone());
    let response = next.run(request).await;

    if !minted {
        return response;
    }

    debug!(target: "qrify::session", "Issued session {}", session);
    let jar = jar.add(session_cookie(&session, state.config.secure_cookies));
    (jar, response).into_response()
}

fn session_cookie(session: &SessionId, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::build((SESSION_COOKIE, session.to_string()))
        .path("/")
        .max_age(time::Duration::days(SESSION_MAX_AGE_DAYS))
        .http_only(true);
    if secure {
        cookie = cookie.secure(true).same_site(SameSite::None);
    }
    cookie.build()
}
