//! Session cookie handling.

use axum::http::header::SET_COOKIE;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use stride_session::SessionAccess;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "stride_session";

/// Session id presented by the browser, if it parses.
pub fn session_id(jar: &CookieJar) -> Option<Uuid> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| cookie.value().parse::<Uuid>().ok())
}

pub fn session_cookie(id: Uuid) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id)
}

/// Attach the session cookie when the access created a new session.
pub fn with_session_cookie<T>(access: &SessionAccess<T>, response: impl IntoResponse) -> Response {
    let mut response = response.into_response();
    if access.created {
        if let Ok(value) = HeaderValue::from_str(&session_cookie(access.id)) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }
    response
}
