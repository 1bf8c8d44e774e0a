use serde::{Deserialize, Serialize};

use super::client::{ApiError, InfraApi};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PingResponse {
    pub message: String,
}

impl InfraApi {
    pub async fn ping_auth(&self) -> Result<PingResponse, ApiError> {
        self.get_json("/auth/ping").await
    }

    pub async fn ping_users(&self) -> Result<PingResponse, ApiError> {
        self.get_json("/users/ping").await
    }

    pub async fn ping_projects(&self) -> Result<PingResponse, ApiError> {
        self.get_json("/projects/ping").await
    }
}
