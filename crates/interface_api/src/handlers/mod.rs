//! Request handlers

pub mod health;
pub mod incidents;
pub mod dispatch;
pub mod reports;
