//! GUI module - user interface components

mod app;
mod sidebar;
mod view;

pub use app::DashboardApp;
pub use sidebar::{Sidebar, SidebarAction};
pub use view::DashboardPanel;
