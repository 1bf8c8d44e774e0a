use axum::{
    extract::{Form, State},
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;

use crate::config::DEFAULT_REGION;
use crate::models::{AppState, SessionUser};
use crate::templates::LoginTemplate;

use super::helpers::{
    build_template_globals, render_template, session_cookie_value, TemplateGlobals, SESSION_COOKIE,
};

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub region: String,
}

pub async fn login_get(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if session_cookie_value(&jar).is_some() {
        return Redirect::to("/dashboard/overview").into_response();
    }
    let TemplateGlobals {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(&state, &jar);
    render_template(LoginTemplate {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
        error: None,
    })
}

pub async fn login_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> impl IntoResponse {
    if form.username == state.login_username && form.password == state.login_password {
        let region = if form.region.trim().is_empty() {
            DEFAULT_REGION.to_string()
        } else {
            form.region.trim().to_string()
        };
        let user = SessionUser::new(form.username, region);
        let value = match serde_json::to_string(&user) {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(%e, "Failed to serialize session marker");
                return Redirect::to("/login").into_response();
            }
        };
        let mut cookie = Cookie::new(SESSION_COOKIE, value);
        cookie.set_path("/");
        cookie.set_http_only(true);
        cookie.set_same_site(SameSite::Lax);
        cookie.set_max_age(time::Duration::days(1));
        tracing::info!(username = %user.username, "Login succeeded");
        return (jar.add(cookie), Redirect::to("/dashboard/overview")).into_response();
    }
    tracing::warn!(username = %form.username, "Login rejected");
    let TemplateGlobals {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(&state, &jar);
    render_template(LoginTemplate {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
        error: Some("Invalid username or password".into()),
    })
}

pub async fn logout_post(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(key) = session_cookie_value(&jar) {
        state.flash_store.lock().unwrap().remove(&key);
        state.draft_store.lock().unwrap().remove(&key);
    }
    let mut cleared = Cookie::new(SESSION_COOKIE, "");
    cleared.set_path("/");
    (jar.remove(cleared), Redirect::to("/login")).into_response()
}

pub async fn dashboard_root_get() -> impl IntoResponse {
    Redirect::to("/dashboard/overview")
}

pub async fn root_get(jar: CookieJar) -> impl IntoResponse {
    if session_cookie_value(&jar).is_some() {
        Redirect::to("/dashboard/overview")
    } else {
        Redirect::to("/login")
    }
}
