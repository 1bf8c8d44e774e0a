use axum::{extract::State, response::IntoResponse};
use axum_extra::extract::cookie::CookieJar;

use crate::config::LIST_REFRESH_SECS;
use crate::models::{AppState, OverviewView};
use crate::templates::OverviewTemplate;

use super::helpers::{build_template_globals, render_template, TemplateGlobals};

pub async fn overview_get(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let (view, error) = match state.api.overview().await {
        Ok(data) => (Some(OverviewView::from(data)), None),
        Err(e) => {
            tracing::error!(%e, "Failed to load dashboard overview");
            (None, Some(e.to_string()))
        }
    };
    let TemplateGlobals {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(&state, &jar);
    render_template(OverviewTemplate {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
        refresh_secs: LIST_REFRESH_SECS,
        error,
        view,
    })
}
