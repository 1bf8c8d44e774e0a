use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::api::Resources;
use crate::models::AppState;
use crate::templates::{
    ErrorCardTemplate, ImportFormView, ProgressItem, StepDetailsTemplate, StepFlavorTemplate,
    StepImageTemplate, StepNetworkTemplate, StepSummaryTemplate, VmImportTemplate,
};
use crate::utils::parse_urlencoded_body;
use crate::wizard::{
    error_for, missing_file_error, validate_import, validate_step, validate_vmdk_filename,
    FieldError, VmDraft, WizardStep,
};

use super::helpers::{
    add_flash, build_template_globals, render_template, session_cookie_value, TemplateGlobals,
};

fn progress_items(current: WizardStep) -> Vec<ProgressItem> {
    WizardStep::ALL
        .iter()
        .map(|step| ProgressItem {
            title: step.title(),
            class: if step.index() < current.index() {
                "step-done"
            } else if *step == current {
                "step-active"
            } else {
                "step-todo"
            },
        })
        .collect()
}

/// Step URLs carry nothing but the slug; the draft itself stays in the
/// server-side store and never reaches browser history or access logs.
fn step_url(step: WizardStep) -> String {
    format!("/dashboard/vm/step/{}", step.slug())
}

fn back_url(step: WizardStep) -> String {
    step_url(step.prev().unwrap_or(WizardStep::Flavor))
}

/// The in-progress draft for this session, or a fresh one.
fn load_draft(state: &AppState, jar: &CookieJar) -> VmDraft {
    session_cookie_value(jar)
        .and_then(|key| state.draft_store.lock().unwrap().get(&key).cloned())
        .unwrap_or_default()
}

fn save_draft(state: &AppState, jar: &CookieJar, draft: VmDraft) {
    if let Some(key) = session_cookie_value(jar) {
        state.draft_store.lock().unwrap().insert(key, draft);
    }
}

fn clear_draft(state: &AppState, jar: &CookieJar) {
    if let Some(key) = session_cookie_value(jar) {
        state.draft_store.lock().unwrap().remove(&key);
    }
}

fn field(draft: &VmDraft, name: &str) -> String {
    draft.get(name).unwrap_or("").to_string()
}

fn resolve_name(refs: &[crate::api::resources::ResourceRef], id: &str) -> String {
    refs.iter()
        .find(|r| r.id == id)
        .map(|r| r.name.clone())
        .unwrap_or_else(|| id.to_string())
}

/// Label/value rows for the summary page, ids resolved to display names.
fn summary_rows(draft: &VmDraft, resources: &Resources) -> Vec<(String, String)> {
    vec![
        ("Flavor".into(), resolve_name(&resources.flavors, &field(draft, "flavor_id"))),
        ("Image".into(), resolve_name(&resources.images, &field(draft, "image_id"))),
        ("Network".into(), resolve_name(&resources.networks, &field(draft, "network_id"))),
        ("Key pair".into(), field(draft, "key_name")),
        ("Security group".into(), field(draft, "security_group")),
        ("VM name".into(), field(draft, "name")),
        ("Admin username".into(), field(draft, "admin_username")),
        ("Admin password".into(), "********".into()),
    ]
}

/// Which step edits a given draft field; used to bounce an incomplete
/// submission back to the right form.
fn step_for_field(field: &str) -> WizardStep {
    match field {
        "flavor_id" => WizardStep::Flavor,
        "image_id" => WizardStep::Image,
        "network_id" | "key_name" | "security_group" => WizardStep::Network,
        _ => WizardStep::Details,
    }
}

fn resources_error_card(
    state: &AppState,
    jar: &CookieJar,
    retry_url: String,
    e: crate::api::ApiError,
) -> Response {
    tracing::error!(%e, "Failed to load wizard resources");
    let TemplateGlobals {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(state, jar);
    render_template(ErrorCardTemplate {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
        title: "Failed to load resources".into(),
        message: e.to_string(),
        retry_url,
    })
}

fn render_step(
    state: &AppState,
    jar: &CookieJar,
    step: WizardStep,
    draft: &VmDraft,
    resources: &Resources,
    errors: &[FieldError],
) -> Response {
    let TemplateGlobals {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(state, jar);
    let progress = progress_items(step);
    match step {
        WizardStep::Flavor => render_template(StepFlavorTemplate {
            current_user,
            api_hostname,
            flash_messages,
            has_flash_messages,
            progress,
            flavors: resources.flavors.clone(),
            selected: field(draft, "flavor_id"),
            error: error_for(errors, "flavor_id"),
        }),
        WizardStep::Image => render_template(StepImageTemplate {
            current_user,
            api_hostname,
            flash_messages,
            has_flash_messages,
            progress,
            back_url: back_url(step),
            images: resources.images.clone(),
            selected: field(draft, "image_id"),
            error: error_for(errors, "image_id"),
        }),
        WizardStep::Network => render_template(StepNetworkTemplate {
            current_user,
            api_hostname,
            flash_messages,
            has_flash_messages,
            progress,
            back_url: back_url(step),
            networks: resources.networks.clone(),
            keypairs: resources.keypairs.clone(),
            security_groups: resources.security_groups.clone(),
            selected_network: field(draft, "network_id"),
            selected_key: field(draft, "key_name"),
            selected_security_group: field(draft, "security_group"),
            network_error: error_for(errors, "network_id"),
            key_error: error_for(errors, "key_name"),
            security_group_error: error_for(errors, "security_group"),
        }),
        WizardStep::Details => render_template(StepDetailsTemplate {
            current_user,
            api_hostname,
            flash_messages,
            has_flash_messages,
            progress,
            back_url: back_url(step),
            name: field(draft, "name"),
            admin_username: field(draft, "admin_username"),
            admin_password: field(draft, "admin_password"),
            name_error: error_for(errors, "name"),
            username_error: error_for(errors, "admin_username"),
            password_error: error_for(errors, "admin_password"),
        }),
        WizardStep::Summary => render_template(StepSummaryTemplate {
            current_user,
            api_hostname,
            flash_messages,
            has_flash_messages,
            progress,
            back_url: back_url(step),
            rows: summary_rows(draft, resources),
        }),
    }
}

pub async fn wizard_step_get(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(slug): Path<String>,
) -> Response {
    let Some(step) = WizardStep::from_slug(&slug) else {
        return Redirect::to(&step_url(WizardStep::Flavor)).into_response();
    };
    let draft = load_draft(&state, &jar);
    if step == WizardStep::Summary {
        // An incomplete draft has no summary; send the operator to the
        // step that still needs input.
        if let Err(missing) = draft.clone().into_request() {
            return Redirect::to(&step_url(step_for_field(missing.field))).into_response();
        }
    }
    let resources = match state.api.list_resources().await {
        Ok(r) => r,
        Err(e) => return resources_error_card(&state, &jar, step_url(step), e),
    };
    render_step(&state, &jar, step, &draft, &resources, &[])
}

pub async fn wizard_step_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(slug): Path<String>,
    body: Bytes,
) -> Response {
    let Some(step) = WizardStep::from_slug(&slug) else {
        return Redirect::to(&step_url(WizardStep::Flavor)).into_response();
    };
    if step == WizardStep::Summary {
        // The summary has no form of its own; a POST here can never change
        // the draft. Bounce to the summary view.
        return Redirect::to(&step_url(WizardStep::Summary)).into_response();
    }
    let form = parse_urlencoded_body(&body);
    match validate_step(step, &form) {
        Ok(values) => {
            let draft = load_draft(&state, &jar).apply(values);
            save_draft(&state, &jar, draft);
            let next = step.next().unwrap_or(WizardStep::Summary);
            Redirect::to(&step_url(next)).into_response()
        }
        Err(errors) => {
            // Invalid input never advances and never touches the stored
            // draft; re-render the form with the typed values and per-field
            // messages.
            let display = load_draft(&state, &jar).overlay(step, &form);
            let resources = match state.api.list_resources().await {
                Ok(r) => r,
                Err(e) => return resources_error_card(&state, &jar, step_url(step), e),
            };
            render_step(&state, &jar, step, &display, &resources, &errors)
        }
    }
}

pub async fn vm_create_post(State(state): State<AppState>, jar: CookieJar) -> Response {
    let draft = load_draft(&state, &jar);
    let request = match draft.clone().into_request() {
        Ok(req) => req,
        Err(missing) => {
            add_flash(&state, &jar, format!("Cannot create VM: {}", missing));
            return Redirect::to(&step_url(step_for_field(missing.field))).into_response();
        }
    };
    match state.api.create_vm(&request).await {
        Ok(resp) => {
            tracing::info!(server_id = %resp.server.id, name = %resp.server.name, "VM created");
            add_flash(
                &state,
                &jar,
                format!("VM {} created with id {}", resp.server.name, resp.server.id),
            );
            // Success resets the wizard: back to the first step, draft gone.
            clear_draft(&state, &jar);
            Redirect::to(&step_url(WizardStep::Flavor)).into_response()
        }
        Err(e) => {
            tracing::error!(%e, "VM creation failed");
            add_flash(&state, &jar, format!("Failed to create VM: {}", e));
            // Failure keeps the stored draft so the submission can be
            // retried as-is.
            let resources = match state.api.list_resources().await {
                Ok(r) => r,
                Err(e) => {
                    return resources_error_card(&state, &jar, step_url(WizardStep::Summary), e)
                }
            };
            render_step(&state, &jar, WizardStep::Summary, &draft, &resources, &[])
        }
    }
}

fn import_form_view(form: &HashMap<String, Vec<String>>) -> ImportFormView {
    let first = |key: &str| -> String {
        form.get(key)
            .and_then(|vs| vs.first())
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    };
    ImportFormView {
        vm_name: first("vm_name"),
        description: first("description"),
        min_disk: first("min_disk"),
        min_ram: first("min_ram"),
        is_public: matches!(first("is_public").as_str(), "on" | "true" | "1"),
        flavor_id: first("flavor_id"),
        network_id: first("network_id"),
        key_name: first("key_name"),
        security_group: first("security_group"),
        admin_password: first("admin_password"),
    }
}

fn render_import(
    state: &AppState,
    jar: &CookieJar,
    resources: &Resources,
    qemu: Option<crate::api::QemuImgCheck>,
    form: ImportFormView,
    errors: &[FieldError],
) -> Response {
    let TemplateGlobals {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(state, jar);
    render_template(VmImportTemplate {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
        flavors: resources.flavors.clone(),
        networks: resources.networks.clone(),
        keypairs: resources.keypairs.clone(),
        security_groups: resources.security_groups.clone(),
        qemu,
        form,
        vm_name_error: error_for(errors, "vm_name"),
        min_disk_error: error_for(errors, "min_disk"),
        min_ram_error: error_for(errors, "min_ram"),
        flavor_error: error_for(errors, "flavor_id"),
        network_error: error_for(errors, "network_id"),
        key_error: error_for(errors, "key_name"),
        security_group_error: error_for(errors, "security_group"),
        password_error: error_for(errors, "admin_password"),
        file_error: error_for(errors, "vmdk_file"),
    })
}

pub async fn vm_import_get(State(state): State<AppState>, jar: CookieJar) -> Response {
    let resources = match state.api.list_resources().await {
        Ok(r) => r,
        Err(e) => return resources_error_card(&state, &jar, "/dashboard/vm/import".into(), e),
    };
    // Advisory only; the page still works when the probe fails.
    let qemu = match state.api.check_qemu_img().await {
        Ok(check) => Some(check),
        Err(e) => {
            tracing::warn!(%e, "qemu-img probe failed");
            None
        }
    };
    render_import(&state, &jar, &resources, qemu, ImportFormView::default(), &[])
}

pub async fn vm_import_post(
    State(state): State<AppState>,
    jar: CookieJar,
    mut multipart: Multipart,
) -> Response {
    let mut form: HashMap<String, Vec<String>> = HashMap::new();
    let mut file: Option<(String, Vec<u8>)> = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(mut field_part)) => {
                let name = field_part.name().unwrap_or_default().to_string();
                if name == "vmdk_file" {
                    let file_name = field_part.file_name().unwrap_or_default().to_string();
                    let mut bytes = Vec::new();
                    loop {
                        match field_part.chunk().await {
                            Ok(Some(chunk)) => bytes.extend_from_slice(&chunk),
                            Ok(None) => break,
                            Err(e) => {
                                tracing::error!(%e, "Upload stream aborted");
                                add_flash(&state, &jar, "Upload failed while reading the file");
                                return Redirect::to("/dashboard/vm/import").into_response();
                            }
                        }
                    }
                    if !file_name.is_empty() && !bytes.is_empty() {
                        file = Some((file_name, bytes));
                    }
                } else {
                    match field_part.text().await {
                        Ok(value) => form.entry(name).or_default().push(value),
                        Err(e) => {
                            tracing::error!(%e, "Malformed multipart field");
                            add_flash(&state, &jar, "Malformed form submission");
                            return Redirect::to("/dashboard/vm/import").into_response();
                        }
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::error!(%e, "Malformed multipart body");
                add_flash(&state, &jar, "Malformed form submission");
                return Redirect::to("/dashboard/vm/import").into_response();
            }
        }
    }

    let mut errors = Vec::new();
    match &file {
        None => errors.push(missing_file_error()),
        Some((name, _)) => {
            if let Some(err) = validate_vmdk_filename(name) {
                errors.push(err);
            }
        }
    }
    let fields = match validate_import(&form) {
        Ok(fields) if errors.is_empty() => Some(fields),
        Ok(_) => None,
        Err(mut field_errors) => {
            errors.append(&mut field_errors);
            None
        }
    };

    let resources = match state.api.list_resources().await {
        Ok(r) => r,
        Err(e) => return resources_error_card(&state, &jar, "/dashboard/vm/import".into(), e),
    };

    let (Some(fields), Some((file_name, file_bytes))) = (fields, file) else {
        // Validation failed before any backend call; echo everything the
        // operator typed. The file input cannot be pre-filled by the
        // browser, so it has to be picked again.
        return render_import(&state, &jar, &resources, None, import_form_view(&form), &errors);
    };

    match state.api.import_vmware_vm(&fields, file_name, file_bytes).await {
        Ok(resp) => {
            tracing::info!(
                image_id = %resp.image.id,
                server_id = %resp.server.id,
                "VM import completed"
            );
            add_flash(
                &state,
                &jar,
                format!(
                    "VM {} imported: image {}, server {}",
                    resp.server.name, resp.image.name, resp.server.id
                ),
            );
            Redirect::to("/dashboard/vm/import").into_response()
        }
        Err(e) => {
            tracing::error!(%e, "VM import failed");
            add_flash(&state, &jar, format!("Failed to import VM: {}", e));
            render_import(&state, &jar, &resources, None, import_form_view(&form), &[])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_marks_done_active_and_todo() {
        let items = progress_items(WizardStep::Network);
        let classes: Vec<&str> = items.iter().map(|i| i.class).collect();
        assert_eq!(
            classes,
            vec!["step-done", "step-done", "step-active", "step-todo", "step-todo"]
        );
    }

    #[test]
    fn step_urls_are_bare_slugs() {
        assert_eq!(step_url(WizardStep::Image), "/dashboard/vm/step/image");
        assert_eq!(step_url(WizardStep::Flavor), "/dashboard/vm/step/flavor");
        assert_eq!(back_url(WizardStep::Summary), "/dashboard/vm/step/details");
    }

    #[test]
    fn missing_fields_map_back_to_their_step() {
        assert_eq!(step_for_field("flavor_id"), WizardStep::Flavor);
        assert_eq!(step_for_field("security_group"), WizardStep::Network);
        assert_eq!(step_for_field("admin_password"), WizardStep::Details);
    }

    #[test]
    fn summary_masks_the_password() {
        let resources = Resources {
            images: vec![],
            flavors: vec![],
            networks: vec![],
            keypairs: vec![],
            security_groups: vec![],
        };
        let draft = VmDraft {
            admin_password: Some("hunter2hunter2".into()),
            ..Default::default()
        };
        let rows = summary_rows(&draft, &resources);
        let password_row = rows.iter().find(|(label, _)| label == "Admin password").unwrap();
        assert_eq!(password_row.1, "********");
        assert!(rows.iter().all(|(_, v)| v != "hunter2hunter2"));
    }
}
