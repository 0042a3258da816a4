pub mod coordinator;
pub mod details;
pub mod suppression;
pub mod surface;
pub mod templates;

pub use coordinator::NotificationCoordinator;
pub use suppression::SuppressionState;
pub use surface::{BrowserSurface, StdioSurface, BLOCKED_VIEW};
pub use templates::Notification;
