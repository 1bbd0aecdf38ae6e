//! External service integrations

pub mod calendar;
pub mod crm;
