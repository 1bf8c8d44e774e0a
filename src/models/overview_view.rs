use crate::api::DashboardOverview;
use crate::utils::{format_percent, mb_to_gb};

#[derive(Clone, Debug)]
pub struct ServiceRow {
    pub name: String,
    pub host: String,
    pub state_display: String,
    pub badge_class: &'static str,
}

/// Snapshot flattened into the strings the overview cards print. All
/// conversions (MB to GB, percent rounding) happen here, never in templates.
#[derive(Clone, Debug)]
pub struct OverviewView {
    pub nodes: u64,
    pub projects: u64,
    pub users: u64,
    pub hypervisor_errors: Vec<String>,

    pub instances_total: u64,
    pub instances_active: u64,
    pub instances_shutoff: u64,
    pub instances_error: u64,
    pub instances_others: u64,

    pub volumes_total: u64,
    pub volumes_available: u64,
    pub volumes_in_use: u64,
    pub volumes_error: u64,

    pub cpu_used: u64,
    pub cpu_total: u64,
    pub cpu_percent: String,
    pub ram_used_display: String,
    pub ram_total_display: String,
    pub ram_percent: String,

    pub compute_services: Vec<ServiceRow>,
    pub network_services: Vec<ServiceRow>,
}

impl From<DashboardOverview> for OverviewView {
    fn from(o: DashboardOverview) -> Self {
        let compute_services = o
            .compute_services
            .into_iter()
            .map(|s| {
                let up = s.state == "up" && s.status == "enabled";
                ServiceRow {
                    name: s.name,
                    host: s.host,
                    state_display: format!("{} / {}", s.status, s.state),
                    badge_class: if up { "badge-ok" } else { "badge-error" },
                }
            })
            .collect();
        let network_services = o
            .network_services
            .into_iter()
            .map(|s| ServiceRow {
                name: s.name,
                host: s.host,
                state_display: if s.alive { "up".into() } else { "down".into() },
                badge_class: if s.alive { "badge-ok" } else { "badge-error" },
            })
            .collect();
        Self {
            nodes: o.platform_info.nodes,
            projects: o.platform_info.projects,
            users: o.platform_info.users,
            hypervisor_errors: o.platform_info.hypervisor_errors,
            instances_total: o.resources.instances.total,
            instances_active: o.resources.instances.active,
            instances_shutoff: o.resources.instances.shutoff,
            instances_error: o.resources.instances.error,
            instances_others: o.resources.instances.others,
            volumes_total: o.resources.volumes.total,
            volumes_available: o.resources.volumes.available,
            volumes_in_use: o.resources.volumes.in_use,
            volumes_error: o.resources.volumes.error,
            cpu_used: o.resources.cpu.used,
            cpu_total: o.resources.cpu.total,
            cpu_percent: format_percent(o.resources.cpu.usage_percent),
            ram_used_display: mb_to_gb(o.resources.ram.used),
            ram_total_display: mb_to_gb(o.resources.ram.total),
            ram_percent: format_percent(o.resources.ram.usage_percent),
            compute_services,
            network_services,
        }
    }
}
