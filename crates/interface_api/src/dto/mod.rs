//! Request and response bodies

pub mod incident;
pub mod dispatch;
pub mod reports;
