use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::api::InfraApi;
use crate::wizard::VmDraft;

#[derive(Clone)]
pub struct AppState {
    pub api: InfraApi,
    /// Credentials the login form is compared against. Client-side gate
    /// only; the backend is the actual authority.
    pub login_username: String,
    pub login_password: String,
    /// Pending flash messages keyed by session cookie value, drained on the
    /// next page render.
    pub flash_store: Arc<Mutex<HashMap<String, Vec<String>>>>,
    /// In-progress wizard drafts keyed by session cookie value. Held in
    /// memory only; the draft never appears in URLs or response bodies.
    pub draft_store: Arc<Mutex<HashMap<String, VmDraft>>>,
    pub custom_css: Option<String>,
}

impl AppState {
    pub fn new(api: InfraApi, login_username: String, login_password: String) -> Self {
        Self {
            api,
            login_username,
            login_password,
            flash_store: Arc::new(Mutex::new(HashMap::new())),
            draft_store: Arc::new(Mutex::new(HashMap::new())),
            custom_css: None,
        }
    }
}
