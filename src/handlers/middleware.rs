use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::handlers::helpers::session_cookie_value;

/// Session gate for the dashboard routes. Presence of the session cookie is
/// the only criterion; the backend is the real authority on every call.
pub async fn auth_middleware(jar: CookieJar, request: Request, next: Next) -> Response {
    if session_cookie_value(&jar).is_some() {
        next.run(request).await
    } else {
        Redirect::to("/login").into_response()
    }
}
