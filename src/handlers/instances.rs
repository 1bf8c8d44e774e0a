use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::cookie::CookieJar;

use crate::config::LIST_REFRESH_SECS;
use crate::models::{AppState, InstanceDetailView, InstanceRow};
use crate::templates::{InstanceDetailTemplate, InstancesTemplate};

use super::helpers::{add_flash, build_template_globals, render_template, TemplateGlobals};

pub async fn instances_get(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let (instances, error) = match state.api.list_instances().await {
        Ok(list) => (list.into_iter().map(InstanceRow::from).collect(), None),
        Err(e) => {
            tracing::error!(%e, "Failed to list instances");
            (vec![], Some(e.to_string()))
        }
    };
    let TemplateGlobals {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(&state, &jar);
    render_template(InstancesTemplate {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
        refresh_secs: LIST_REFRESH_SECS,
        error,
        instances,
    })
}

pub async fn instance_detail_get(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(instance_id): Path<String>,
) -> impl IntoResponse {
    let (view, error) = match state.api.instance_details(&instance_id).await {
        Ok(details) => (Some(InstanceDetailView::from(details)), None),
        Err(e) => {
            tracing::error!(%instance_id, %e, "Failed to load instance details");
            (None, Some(e.to_string()))
        }
    };
    let TemplateGlobals {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(&state, &jar);
    render_template(InstanceDetailTemplate {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
        instance_id,
        error,
        view,
    })
}

/// Instance rows expose the same power and delete verbs as the server list;
/// both address the compute service by server id.
pub async fn instance_action_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Path((instance_id, action)): Path<(String, String)>,
) -> impl IntoResponse {
    let result = match action.as_str() {
        "start" => state.api.start_server(&instance_id).await,
        "stop" => state.api.stop_server(&instance_id).await,
        "reboot" => state.api.reboot_server(&instance_id).await,
        "delete" => state.api.delete_server(&instance_id).await,
        other => {
            tracing::warn!(action = other, "Unknown instance action");
            add_flash(&state, &jar, format!("Unknown action '{}'", other));
            return Redirect::to("/dashboard/instances");
        }
    };
    match result {
        Ok(resp) => {
            tracing::info!(%instance_id, %action, "Instance action accepted");
            add_flash(&state, &jar, resp.message);
        }
        Err(e) => {
            tracing::error!(%instance_id, %action, %e, "Instance action failed");
            add_flash(&state, &jar, format!("Failed to {} instance: {}", action, e));
        }
    }
    Redirect::to("/dashboard/instances")
}
