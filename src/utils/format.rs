/// The overview endpoint reports RAM in megabytes; the cards show gigabytes.
pub fn mb_to_gb(mb: u64) -> String {
    format!("{:.1} GB", mb as f64 / 1024.0)
}

pub fn format_percent(percent: f64) -> String {
    format!("{:.1}%", percent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_megabytes() {
        assert_eq!(mb_to_gb(2048), "2.0 GB");
        assert_eq!(mb_to_gb(1536), "1.5 GB");
    }

    #[test]
    fn formats_percent_with_one_decimal() {
        assert_eq!(format_percent(42.0), "42.0%");
        assert_eq!(format_percent(66.666), "66.7%");
    }
}
