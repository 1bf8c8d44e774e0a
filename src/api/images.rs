use serde::{Deserialize, Serialize};

use super::client::{ApiError, InfraApi};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Image {
    pub id: String,
    pub name: String,
    pub status: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImageImportResponse {
    pub message: String,
    pub image_id: String,
    pub visibility: String,
}

impl InfraApi {
    pub async fn list_images(&self) -> Result<Vec<Image>, ApiError> {
        self.get_json("/image/images").await
    }

    /// Queue a Glance import of an image fetched from a remote URL.
    pub async fn import_image_from_url(
        &self,
        image_url: &str,
        image_name: &str,
        visibility: &str,
    ) -> Result<ImageImportResponse, ApiError> {
        self.post_query(
            "/image/images/import-from-url",
            &[
                ("image_url", image_url),
                ("image_name", image_name),
                ("visibility", visibility),
            ],
        )
        .await
    }
}
