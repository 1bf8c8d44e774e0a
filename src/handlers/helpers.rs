use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;

use crate::models::{AppState, SessionUser};

/// Name of the session marker cookie. Its value is a display-only JSON blob;
/// the gate checks presence, nothing else.
pub const SESSION_COOKIE: &str = "user";

pub fn session_cookie_value(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|c| c.value().to_string())
}

pub fn session_user_from_jar(jar: &CookieJar) -> Option<SessionUser> {
    let raw = session_cookie_value(jar)?;
    serde_json::from_str(&raw).ok()
}

/// Queue a notification for the next page this session renders.
pub fn add_flash(state: &AppState, jar: &CookieJar, message: impl Into<String>) {
    if let Some(key) = session_cookie_value(jar) {
        let mut store = state.flash_store.lock().unwrap();
        store.entry(key).or_default().push(message.into());
    }
}

pub fn take_flash_messages(state: &AppState, jar: &CookieJar) -> Vec<String> {
    let Some(key) = session_cookie_value(jar) else {
        return vec![];
    };
    let mut store = state.flash_store.lock().unwrap();
    store.remove(&key).unwrap_or_default()
}

#[derive(Default)]
pub struct TemplateGlobals {
    pub current_user: Option<SessionUser>,
    pub api_hostname: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
}

pub fn build_template_globals(state: &AppState, jar: &CookieJar) -> TemplateGlobals {
    let current_user = session_user_from_jar(jar);
    let flash_messages = take_flash_messages(state, jar);
    let has_flash_messages = !flash_messages.is_empty();
    TemplateGlobals {
        current_user,
        api_hostname: crate::utils::hostname_from_url(state.api.base_url()),
        flash_messages,
        has_flash_messages,
    }
}

pub fn render_template<T: askama::Template>(t: T) -> Response {
    match t.render() {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            tracing::error!(%e, "Template render error");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InfraApi;
    use axum_extra::extract::cookie::Cookie;

    fn test_state() -> AppState {
        let api = InfraApi::new(reqwest::Client::new(), "http://127.0.0.1:1/api/v1");
        AppState::new(api, "admin".into(), "admin".into())
    }

    fn jar_with_session() -> CookieJar {
        CookieJar::default().add(Cookie::new(
            SESSION_COOKIE,
            r#"{"username":"admin","region":"regionone","login_time":"2026-01-01T00:00:00Z"}"#,
        ))
    }

    #[test]
    fn flash_messages_drain_on_read() {
        let state = test_state();
        let jar = jar_with_session();
        add_flash(&state, &jar, "Server started");
        add_flash(&state, &jar, "Server stopped");
        assert_eq!(take_flash_messages(&state, &jar), vec!["Server started", "Server stopped"]);
        assert!(take_flash_messages(&state, &jar).is_empty());
    }

    #[test]
    fn flash_without_session_is_dropped() {
        let state = test_state();
        let jar = CookieJar::default();
        add_flash(&state, &jar, "lost");
        assert!(state.flash_store.lock().unwrap().is_empty());
    }

    #[test]
    fn session_cookie_parses_into_user() {
        let user = session_user_from_jar(&jar_with_session()).unwrap();
        assert_eq!(user.username, "admin");
        assert_eq!(user.region, "regionone");
    }
}
