//! Prelude module for convenient imports

pub use super::profiles::Entity as Profiles;
pub use super::support_logs::Entity as SupportLogs;
