pub mod config;
pub mod error;
pub mod layout;
pub mod sidebar;
pub mod templates;

pub use config::{
  Config,
  MarkupConfig,
  OutlineConfig,
  ReadingConfig,
  TrackerConfig,
};
pub use error::ConfigError;
pub use layout::{Aside, LayoutConfig};
pub use sidebar::{Sidebar, SidebarItem, SidebarSection};
