use axum::{
    extract::{Form, State},
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::config::LIST_REFRESH_SECS;
use crate::models::{AppState, ImageRow};
use crate::templates::ImagesTemplate;

use super::helpers::{add_flash, build_template_globals, render_template, TemplateGlobals};

pub async fn images_get(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let (images, error) = match state.api.list_images().await {
        Ok(list) => (list.into_iter().map(ImageRow::from).collect(), None),
        Err(e) => {
            tracing::error!(%e, "Failed to list images");
            (vec![], Some(e.to_string()))
        }
    };
    let TemplateGlobals {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(&state, &jar);
    render_template(ImagesTemplate {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
        refresh_secs: LIST_REFRESH_SECS,
        error,
        images,
    })
}

#[derive(Deserialize)]
pub struct ImportUrlForm {
    pub image_name: String,
    pub image_url: String,
    #[serde(default)]
    pub visibility: String,
}

pub async fn images_import_url_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ImportUrlForm>,
) -> impl IntoResponse {
    let name = form.image_name.trim();
    let url = form.image_url.trim();
    if name.is_empty() || url.is_empty() {
        add_flash(&state, &jar, "Image name and URL are both required");
        return Redirect::to("/dashboard/images");
    }
    let visibility = match form.visibility.as_str() {
        "public" => "public",
        _ => "private",
    };
    match state.api.import_image_from_url(url, name, visibility).await {
        Ok(resp) => {
            tracing::info!(image_id = %resp.image_id, "Image import queued");
            add_flash(&state, &jar, resp.message);
        }
        Err(e) => {
            tracing::error!(%e, "Image import failed");
            add_flash(&state, &jar, format!("Failed to import image: {}", e));
        }
    }
    Redirect::to("/dashboard/images")
}
