pub mod auth;
pub mod helpers;
pub mod images;
pub mod instances;
pub mod middleware;
pub mod overview;
pub mod servers;
pub mod wizard;
