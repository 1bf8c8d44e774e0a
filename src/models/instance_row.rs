use crate::api::InstanceListItem;
use crate::utils::status_formatter::{format_status, status_class};

#[derive(Clone, Debug)]
pub struct InstanceRow {
    pub id: String,
    pub instance_name: String,
    pub image_name: String,
    pub ip_address: String,
    pub flavor: String,
    pub key_pair: String,
    pub status: String,
    pub status_display: String,
    pub badge_class: &'static str,
    pub availability_zone: String,
    pub task: String,
    pub power_state: String,
    pub age: String,
    pub is_active: bool,
}

impl From<InstanceListItem> for InstanceRow {
    fn from(i: InstanceListItem) -> Self {
        let is_active = i.status.eq_ignore_ascii_case("ACTIVE");
        Self {
            status_display: format_status(&i.status),
            badge_class: status_class(&i.status),
            id: i.id,
            instance_name: i.instance_name,
            image_name: i.image_name,
            ip_address: i.ip_address,
            flavor: i.flavor,
            key_pair: i.key_pair,
            status: i.status,
            availability_zone: i.availability_zone,
            task: i.task,
            power_state: i.power_state,
            age: i.age,
            is_active,
        }
    }
}
