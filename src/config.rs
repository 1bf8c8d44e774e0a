use std::env;
use std::path::Path;

// Default configuration constants
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000/api/v1";
pub const DEFAULT_LOGIN_USERNAME: &str = "admin";
pub const DEFAULT_LOGIN_PASSWORD: &str = "admin";
pub const DEFAULT_REGION: &str = "regionone";

/// Interval (seconds) at which list and overview pages re-fetch themselves.
pub const LIST_REFRESH_SECS: u16 = 30;

pub fn load_env_file(env_file: Option<&str>) {
    if let Some(path) = env_file {
        dotenvy::from_path(Path::new(path)).ok();
    } else {
        dotenvy::dotenv().ok();
    }
}

pub fn get_backend_url() -> String {
    sanitize_base_url(
        &env::var("ICONSOLE_BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string()),
    )
}

/// Username the login form is compared against. This is a UI convenience,
/// not a security boundary: the backend is what enforces access.
pub fn get_login_username() -> String {
    env::var("ICONSOLE_LOGIN_USERNAME").unwrap_or_else(|_| DEFAULT_LOGIN_USERNAME.to_string())
}

pub fn get_login_password() -> String {
    env::var("ICONSOLE_LOGIN_PASSWORD").unwrap_or_else(|_| DEFAULT_LOGIN_PASSWORD.to_string())
}

fn sanitize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_BACKEND_URL.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_trailing_slash() {
        assert_eq!(
            sanitize_base_url("http://10.0.0.1:8000/api/v1/"),
            "http://10.0.0.1:8000/api/v1"
        );
    }

    #[test]
    fn sanitize_empty_falls_back_to_default() {
        assert_eq!(sanitize_base_url("   "), DEFAULT_BACKEND_URL);
    }
}
