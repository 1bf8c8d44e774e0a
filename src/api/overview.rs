use serde::{Deserialize, Serialize};

use super::client::{ApiError, InfraApi};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlatformInfo {
    pub nodes: u64,
    pub projects: u64,
    pub users: u64,
    #[serde(default)]
    pub hypervisor_errors: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InstanceCounts {
    pub total: u64,
    #[serde(rename = "ACTIVE")]
    pub active: u64,
    #[serde(rename = "SHUTOFF")]
    pub shutoff: u64,
    #[serde(rename = "ERROR")]
    pub error: u64,
    #[serde(rename = "OTHERS")]
    pub others: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VolumeCounts {
    pub total: u64,
    pub available: u64,
    #[serde(rename = "in-use")]
    pub in_use: u64,
    pub error: u64,
    #[serde(rename = "OTHERS")]
    pub others: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UtilizationStats {
    pub used: u64,
    pub total: u64,
    pub unused: u64,
    pub usage_percent: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OverviewResources {
    pub instances: InstanceCounts,
    pub volumes: VolumeCounts,
    pub cpu: UtilizationStats,
    pub ram: UtilizationStats,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ComputeService {
    pub name: String,
    pub host: String,
    pub status: String,
    pub state: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NetworkService {
    pub name: String,
    pub host: String,
    pub alive: bool,
}

/// Aggregate snapshot behind the overview page; treated as immutable per
/// fetch, no local mutation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DashboardOverview {
    pub platform_info: PlatformInfo,
    pub resources: OverviewResources,
    #[serde(default)]
    pub compute_services: Vec<ComputeService>,
    #[serde(default)]
    pub network_services: Vec<NetworkService>,
}

impl InfraApi {
    pub async fn overview(&self) -> Result<DashboardOverview, ApiError> {
        self.get_json("/dashboard/overview").await
    }
}
