use serde::{Deserialize, Serialize};

use super::client::{ApiError, InfraApi};

/// An id/name pair used to populate selection inputs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResourceRef {
    pub id: String,
    pub name: String,
}

/// Keypairs and security groups are addressed by name alone in Nova.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

/// Reference data for the VM creation and import forms. Read-only to the
/// console; none of these have a lifecycle here.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Resources {
    #[serde(default)]
    pub images: Vec<ResourceRef>,
    #[serde(default)]
    pub flavors: Vec<ResourceRef>,
    #[serde(default)]
    pub networks: Vec<ResourceRef>,
    #[serde(default)]
    pub keypairs: Vec<NamedRef>,
    #[serde(default)]
    pub security_groups: Vec<NamedRef>,
}

impl InfraApi {
    pub async fn list_resources(&self) -> Result<Resources, ApiError> {
        self.get_json("/nova/resources").await
    }
}
