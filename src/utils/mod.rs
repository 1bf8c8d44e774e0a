// URL handling utilities
pub mod url_encoding;
pub mod url_parser;

// Display formatting utilities
pub mod format;
pub mod status_formatter;

// Re-export all utilities for convenient access
pub use format::{format_percent, mb_to_gb};
pub use status_formatter::format_status;
pub use url_encoding::parse_urlencoded_body;
pub use url_parser::hostname_from_url;
