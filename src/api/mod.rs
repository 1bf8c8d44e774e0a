// Atomic API modules, one per backend service area
pub mod client;
pub mod images;
pub mod instances;
pub mod overview;
pub mod ping;
pub mod resources;
pub mod servers;
pub mod vm;

// Re-export the client and the wire types handlers work with
pub use client::{ApiError, InfraApi};
pub use images::{Image, ImageImportResponse};
pub use instances::{InstanceDetails, InstanceListItem};
pub use overview::DashboardOverview;
pub use ping::PingResponse;
pub use resources::Resources;
pub use servers::{ActionResponse, Server};
pub use vm::{ImportVmFields, QemuImgCheck, VmCreateRequest, VmCreateResponse, VmImportResponse};
