use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use super::client::{ApiError, InfraApi};

/// Complete VM creation payload. Assembled by the wizard draft; every field
/// is required by the time this struct exists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmCreateRequest {
    pub name: String,
    pub image_id: String,
    pub flavor_id: String,
    pub network_id: String,
    pub key_name: String,
    pub security_group: String,
    pub admin_username: String,
    pub admin_password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreatedServer {
    pub id: String,
    pub name: String,
    pub status: String,
    pub admin_username: String,
    pub admin_password: String,
    pub ssh_key: String,
    pub floating_ip: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VmCreateResponse {
    pub status: String,
    pub server: CreatedServer,
}

/// Text fields accompanying the VMDK upload.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ImportVmFields {
    pub vm_name: String,
    pub description: String,
    pub min_disk: u64,
    pub min_ram: u64,
    pub is_public: bool,
    pub flavor_id: String,
    pub network_id: String,
    pub key_name: String,
    pub security_group: String,
    pub admin_password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImportedImage {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImportedServer {
    pub id: String,
    pub name: String,
    pub status: String,
    pub floating_ip: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VmImportResponse {
    pub status: String,
    pub image: ImportedImage,
    pub server: ImportedServer,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QemuImgCheck {
    pub installed: bool,
    pub version: String,
}

impl InfraApi {
    pub async fn create_vm(&self, req: &VmCreateRequest) -> Result<VmCreateResponse, ApiError> {
        let body = serde_json::to_value(req).unwrap_or_default();
        self.post_json("/nova/create-vm", &body).await
    }

    /// Forward an uploaded VMDK plus its form fields as one multipart body.
    pub async fn import_vmware_vm(
        &self,
        fields: &ImportVmFields,
        file_name: String,
        file_bytes: Vec<u8>,
    ) -> Result<VmImportResponse, ApiError> {
        let form = Form::new()
            .part("vmdk_file", Part::bytes(file_bytes).file_name(file_name))
            .text("vm_name", fields.vm_name.clone())
            .text("description", fields.description.clone())
            .text("min_disk", fields.min_disk.to_string())
            .text("min_ram", fields.min_ram.to_string())
            .text("is_public", fields.is_public.to_string())
            .text("flavor_id", fields.flavor_id.clone())
            .text("network_id", fields.network_id.clone())
            .text("key_name", fields.key_name.clone())
            .text("security_group", fields.security_group.clone())
            .text("admin_password", fields.admin_password.clone());
        self.post_multipart("/nova/import-vmware-vm", form).await
    }

    /// The backend needs qemu-img on its side to convert VMDK uploads.
    pub async fn check_qemu_img(&self) -> Result<QemuImgCheck, ApiError> {
        self.get_json("/nova/check-qemu-img").await
    }
}
