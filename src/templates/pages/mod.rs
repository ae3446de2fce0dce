pub mod dashboard;
pub mod runs;

pub use dashboard::{dashboard_error_page, dashboard_page, DashboardVm};
pub use runs::runs_page;
