use serde::{Deserialize, Serialize};

use super::client::{ApiError, InfraApi};

/// Row from the instances list endpoint. The backend precomputes the
/// display-oriented columns (age, power state) so this stays a plain record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InstanceListItem {
    pub id: String,
    pub instance_name: String,
    pub image_name: String,
    pub ip_address: String,
    pub flavor: String,
    pub key_pair: String,
    pub status: String,
    pub availability_zone: String,
    pub task: String,
    pub power_state: String,
    pub age: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlavorDetails {
    pub name: String,
    pub ram: String,
    pub vcpus: u32,
    pub disk: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImageDetails {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NetworkDetails {
    pub network: String,
    pub ip: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VolumeDetails {
    pub id: String,
    pub name: String,
    pub size: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InstanceDetails {
    pub id: String,
    pub name: String,
    pub status: String,
    pub locked: bool,
    pub project_id: String,
    pub created_at: String,
    pub host: String,
    pub flavor: FlavorDetails,
    pub image: ImageDetails,
    #[serde(default)]
    pub networks: Vec<NetworkDetails>,
    #[serde(default)]
    pub security_groups: Vec<String>,
    #[serde(default)]
    pub volumes: Vec<VolumeDetails>,
    #[serde(default)]
    pub floating_ips: Vec<String>,
}

impl InfraApi {
    pub async fn list_instances(&self) -> Result<Vec<InstanceListItem>, ApiError> {
        self.get_json("/nova/instances").await
    }

    pub async fn instance_details(&self, id: &str) -> Result<InstanceDetails, ApiError> {
        self.get_json(&format!("/nova/servers/{}", id)).await
    }
}
