use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::cookie::CookieJar;

use crate::config::LIST_REFRESH_SECS;
use crate::models::{AppState, ServerRow};
use crate::templates::ServersTemplate;

use super::helpers::{add_flash, build_template_globals, render_template, TemplateGlobals};

pub async fn servers_get(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let (servers, error) = match state.api.list_servers().await {
        Ok(list) => (list.into_iter().map(ServerRow::from).collect(), None),
        Err(e) => {
            tracing::error!(%e, "Failed to list servers");
            (vec![], Some(e.to_string()))
        }
    };
    let TemplateGlobals {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(&state, &jar);
    render_template(ServersTemplate {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
        refresh_secs: LIST_REFRESH_SECS,
        error,
        servers,
    })
}

/// Power and delete actions. Always answers with a redirect back to the
/// list so the follow-up GET re-fetches fresh state.
pub async fn server_action_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Path((server_id, action)): Path<(String, String)>,
) -> impl IntoResponse {
    let result = match action.as_str() {
        "start" => state.api.start_server(&server_id).await,
        "stop" => state.api.stop_server(&server_id).await,
        "reboot" => state.api.reboot_server(&server_id).await,
        "delete" => state.api.delete_server(&server_id).await,
        other => {
            tracing::warn!(action = other, "Unknown server action");
            add_flash(&state, &jar, format!("Unknown action '{}'", other));
            return Redirect::to("/dashboard/servers");
        }
    };
    match result {
        Ok(resp) => {
            tracing::info!(%server_id, %action, "Server action accepted");
            add_flash(&state, &jar, resp.message);
        }
        Err(e) => {
            tracing::error!(%server_id, %action, %e, "Server action failed");
            add_flash(&state, &jar, format!("Failed to {} server: {}", action, e));
        }
    }
    Redirect::to("/dashboard/servers")
}
