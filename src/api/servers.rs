use serde::{Deserialize, Serialize};

use super::client::{ApiError, InfraApi};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Server {
    pub id: String,
    pub name: String,
    pub status: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActionResponse {
    pub message: String,
}

impl InfraApi {
    pub async fn list_servers(&self) -> Result<Vec<Server>, ApiError> {
        self.get_json("/nova/servers").await
    }

    pub async fn start_server(&self, id: &str) -> Result<ActionResponse, ApiError> {
        self.post_json(&format!("/nova/start/{}", id), &serde_json::json!({})).await
    }

    pub async fn stop_server(&self, id: &str) -> Result<ActionResponse, ApiError> {
        self.post_json(&format!("/nova/stop/{}", id), &serde_json::json!({})).await
    }

    pub async fn reboot_server(&self, id: &str) -> Result<ActionResponse, ApiError> {
        self.post_json(&format!("/nova/reboot/{}", id), &serde_json::json!({})).await
    }

    pub async fn delete_server(&self, id: &str) -> Result<ActionResponse, ApiError> {
        self.delete_json(&format!("/nova/delete/{}", id)).await
    }
}
