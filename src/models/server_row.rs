use crate::api::Server;
use crate::utils::status_formatter::{format_status, status_class};

#[derive(Clone, Debug)]
pub struct ServerRow {
    pub id: String,
    pub name: String,
    pub status: String,
    pub status_display: String,
    pub badge_class: &'static str,
    /// Start is offered for stopped servers, stop/reboot for running ones.
    pub is_active: bool,
}

impl From<Server> for ServerRow {
    fn from(s: Server) -> Self {
        let is_active = s.status.eq_ignore_ascii_case("ACTIVE");
        Self {
            status_display: format_status(&s.status),
            badge_class: status_class(&s.status),
            id: s.id,
            name: s.name,
            status: s.status,
            is_active,
        }
    }
}
