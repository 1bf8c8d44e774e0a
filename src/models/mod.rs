pub mod app_state;
pub mod image_row;
pub mod instance_detail_view;
pub mod instance_row;
pub mod overview_view;
pub mod server_row;
pub mod session;

pub use app_state::AppState;
pub use image_row::ImageRow;
pub use instance_detail_view::InstanceDetailView;
pub use instance_row::InstanceRow;
pub use overview_view::{OverviewView, ServiceRow};
pub use server_row::ServerRow;
pub use session::SessionUser;
