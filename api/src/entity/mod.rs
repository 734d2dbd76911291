//! Entity module for database models

pub mod prelude;
pub mod profiles;
pub mod support_logs;
