use serde::{Deserialize, Serialize};

/// Contents of the `user` cookie. Deliberately a non-sensitive marker: the
/// gate only checks that the cookie exists, the fields are display-only.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionUser {
    pub username: String,
    pub region: String,
    pub login_time: String,
}

impl SessionUser {
    pub fn new(username: String, region: String) -> Self {
        Self {
            username,
            region,
            login_time: chrono::Utc::now().to_rfc3339(),
        }
    }
}
