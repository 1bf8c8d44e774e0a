/// Human-readable label for a Nova instance/server status.
pub fn format_status(status: &str) -> String {
    match status.to_uppercase().as_str() {
        "ACTIVE" => "Active".to_string(),
        "SHUTOFF" => "Shut off".to_string(),
        "ERROR" => "Error".to_string(),
        "BUILD" => "Building".to_string(),
        "DELETED" => "Deleted".to_string(),
        _ => status.to_string(),
    }
}

/// CSS badge class for a status, used by the list templates.
pub fn status_class(status: &str) -> &'static str {
    match status.to_uppercase().as_str() {
        "ACTIVE" => "badge-ok",
        "SHUTOFF" => "badge-muted",
        "ERROR" => "badge-error",
        "BUILD" => "badge-progress",
        _ => "badge-muted",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_get_labels() {
        assert_eq!(format_status("ACTIVE"), "Active");
        assert_eq!(format_status("SHUTOFF"), "Shut off");
        assert_eq!(format_status("BUILD"), "Building");
    }

    #[test]
    fn unknown_status_passes_through() {
        assert_eq!(format_status("PAUSED"), "PAUSED");
        assert_eq!(status_class("PAUSED"), "badge-muted");
    }
}
