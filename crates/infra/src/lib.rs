//! # Studiobook Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - HTTP clients for the external calendar (structured API and ICS feed)
//! - The webhook fallback for calendar writes
//! - The CRM lead client
//! - Environment configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `studiobook-core`
//! - Contains all "impure" code (I/O, environment)

pub mod config;
pub mod errors;
pub mod integrations;
pub mod wiring;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use integrations::*;
pub use wiring::*;
