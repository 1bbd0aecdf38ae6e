//! CRM integration adapters

pub mod kommo;

pub use kommo::KommoClient;
