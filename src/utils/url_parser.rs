pub fn hostname_from_url(u: &str) -> String {
    let s = u.trim();
    if s.is_empty() {
        return "".into();
    }
    let s = if let Some(idx) = s.find("://") { &s[idx + 3..] } else { s };
    let host = s.split('/').next().unwrap_or(s);
    host.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scheme_and_path() {
        assert_eq!(hostname_from_url("http://127.0.0.1:8000/api/v1"), "127.0.0.1:8000");
    }

    #[test]
    fn bare_host_passes_through() {
        assert_eq!(hostname_from_url("controller.lab"), "controller.lab");
    }
}
