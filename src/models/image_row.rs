use crate::api::Image;

#[derive(Clone, Debug)]
pub struct ImageRow {
    pub id: String,
    pub name: String,
    pub status: String,
    pub status_display: String,
    pub badge_class: &'static str,
}

impl From<Image> for ImageRow {
    fn from(img: Image) -> Self {
        let (status_display, badge_class) = match img.status.to_lowercase().as_str() {
            "active" => ("Active".to_string(), "badge-ok"),
            "queued" => ("Queued".to_string(), "badge-progress"),
            "saving" => ("Saving".to_string(), "badge-progress"),
            other => (other.to_string(), "badge-muted"),
        };
        Self {
            id: img.id,
            name: img.name,
            status: img.status,
            status_display,
            badge_class,
        }
    }
}
