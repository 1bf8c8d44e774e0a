use crate::api::InstanceDetails;
use crate::utils::status_formatter::{format_status, status_class};

#[derive(Clone, Debug)]
pub struct NetworkRow {
    pub network: String,
    pub ip: String,
    pub kind: String,
}

#[derive(Clone, Debug)]
pub struct VolumeRow {
    pub id: String,
    pub name: String,
    pub size: String,
}

#[derive(Clone, Debug)]
pub struct InstanceDetailView {
    pub id: String,
    pub name: String,
    pub status_display: String,
    pub badge_class: &'static str,
    /// Label/value pairs for the summary table.
    pub details: Vec<(String, String)>,
    pub networks: Vec<NetworkRow>,
    pub security_groups: Vec<String>,
    pub volumes: Vec<VolumeRow>,
    pub floating_ips: Vec<String>,
}

impl From<InstanceDetails> for InstanceDetailView {
    fn from(d: InstanceDetails) -> Self {
        let details = vec![
            ("Project".to_string(), d.project_id.clone()),
            ("Host".to_string(), d.host.clone()),
            ("Created".to_string(), d.created_at.clone()),
            ("Locked".to_string(), if d.locked { "yes".into() } else { "no".into() }),
            (
                "Flavor".to_string(),
                format!(
                    "{} ({} vCPU / {} RAM / {} disk)",
                    d.flavor.name, d.flavor.vcpus, d.flavor.ram, d.flavor.disk
                ),
            ),
            ("Image".to_string(), d.image.name.clone()),
        ];
        Self {
            status_display: format_status(&d.status),
            badge_class: status_class(&d.status),
            id: d.id,
            name: d.name,
            details,
            networks: d
                .networks
                .into_iter()
                .map(|n| NetworkRow { network: n.network, ip: n.ip, kind: n.kind })
                .collect(),
            security_groups: d.security_groups,
            volumes: d
                .volumes
                .into_iter()
                .map(|v| VolumeRow { id: v.id, name: v.name, size: v.size })
                .collect(),
            floating_ips: d.floating_ips,
        }
    }
}
