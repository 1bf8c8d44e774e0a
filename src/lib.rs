pub mod api;
pub mod app;
pub mod config;
pub mod handlers;
pub mod models;
pub mod templates;
pub mod utils;
pub mod wizard;
