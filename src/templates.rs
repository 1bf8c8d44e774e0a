use askama::Template;

use crate::api::resources::{NamedRef, ResourceRef};
use crate::api::QemuImgCheck;
use crate::models::{ImageRow, InstanceDetailView, InstanceRow, OverviewView, ServerRow, SessionUser};

/// One segment of the wizard progress rail.
#[derive(Clone, Debug)]
pub struct ProgressItem {
    pub title: &'static str,
    pub class: &'static str,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub current_user: Option<SessionUser>,
    pub api_hostname: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "overview.html")]
pub struct OverviewTemplate {
    pub current_user: Option<SessionUser>,
    pub api_hostname: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    pub refresh_secs: u16,
    pub error: Option<String>,
    pub view: Option<OverviewView>,
}

#[derive(Template)]
#[template(path = "instances.html")]
pub struct InstancesTemplate {
    pub current_user: Option<SessionUser>,
    pub api_hostname: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    pub refresh_secs: u16,
    pub error: Option<String>,
    pub instances: Vec<InstanceRow>,
}

#[derive(Template)]
#[template(path = "instance_detail.html")]
pub struct InstanceDetailTemplate {
    pub current_user: Option<SessionUser>,
    pub api_hostname: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    pub instance_id: String,
    pub error: Option<String>,
    pub view: Option<InstanceDetailView>,
}

#[derive(Template)]
#[template(path = "servers.html")]
pub struct ServersTemplate {
    pub current_user: Option<SessionUser>,
    pub api_hostname: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    pub refresh_secs: u16,
    pub error: Option<String>,
    pub servers: Vec<ServerRow>,
}

#[derive(Template)]
#[template(path = "images.html")]
pub struct ImagesTemplate {
    pub current_user: Option<SessionUser>,
    pub api_hostname: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    pub refresh_secs: u16,
    pub error: Option<String>,
    pub images: Vec<ImageRow>,
}

/// Generic full-page error card with a retry control, for pages whose
/// reference data failed to load.
#[derive(Template)]
#[template(path = "error_card.html")]
pub struct ErrorCardTemplate {
    pub current_user: Option<SessionUser>,
    pub api_hostname: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    pub title: String,
    pub message: String,
    pub retry_url: String,
}

#[derive(Template)]
#[template(path = "step_flavor.html")]
pub struct StepFlavorTemplate {
    pub current_user: Option<SessionUser>,
    pub api_hostname: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    pub progress: Vec<ProgressItem>,
    pub flavors: Vec<ResourceRef>,
    pub selected: String,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "step_image.html")]
pub struct StepImageTemplate {
    pub current_user: Option<SessionUser>,
    pub api_hostname: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    pub progress: Vec<ProgressItem>,
    pub back_url: String,
    pub images: Vec<ResourceRef>,
    pub selected: String,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "step_network.html")]
pub struct StepNetworkTemplate {
    pub current_user: Option<SessionUser>,
    pub api_hostname: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    pub progress: Vec<ProgressItem>,
    pub back_url: String,
    pub networks: Vec<ResourceRef>,
    pub keypairs: Vec<NamedRef>,
    pub security_groups: Vec<NamedRef>,
    pub selected_network: String,
    pub selected_key: String,
    pub selected_security_group: String,
    pub network_error: Option<String>,
    pub key_error: Option<String>,
    pub security_group_error: Option<String>,
}

#[derive(Template)]
#[template(path = "step_details.html")]
pub struct StepDetailsTemplate {
    pub current_user: Option<SessionUser>,
    pub api_hostname: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    pub progress: Vec<ProgressItem>,
    pub back_url: String,
    pub name: String,
    pub admin_username: String,
    pub admin_password: String,
    pub name_error: Option<String>,
    pub username_error: Option<String>,
    pub password_error: Option<String>,
}

#[derive(Template)]
#[template(path = "step_summary.html")]
pub struct StepSummaryTemplate {
    pub current_user: Option<SessionUser>,
    pub api_hostname: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    pub progress: Vec<ProgressItem>,
    pub back_url: String,
    /// Label/value rows of the accumulated draft, names already resolved.
    pub rows: Vec<(String, String)>,
}

/// Current field values of the import form, echoed back on re-render so a
/// failed submission keeps what the operator typed.
#[derive(Clone, Debug, Default)]
pub struct ImportFormView {
    pub vm_name: String,
    pub description: String,
    pub min_disk: String,
    pub min_ram: String,
    pub is_public: bool,
    pub flavor_id: String,
    pub network_id: String,
    pub key_name: String,
    pub security_group: String,
    pub admin_password: String,
}

#[derive(Template)]
#[template(path = "vm_import.html")]
pub struct VmImportTemplate {
    pub current_user: Option<SessionUser>,
    pub api_hostname: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    pub flavors: Vec<ResourceRef>,
    pub networks: Vec<ResourceRef>,
    pub keypairs: Vec<NamedRef>,
    pub security_groups: Vec<NamedRef>,
    pub qemu: Option<QemuImgCheck>,
    pub form: ImportFormView,
    pub vm_name_error: Option<String>,
    pub min_disk_error: Option<String>,
    pub min_ram_error: Option<String>,
    pub flavor_error: Option<String>,
    pub network_error: Option<String>,
    pub key_error: Option<String>,
    pub security_group_error: Option<String>,
    pub password_error: Option<String>,
    pub file_error: Option<String>,
}
