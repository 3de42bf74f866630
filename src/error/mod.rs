//! Error handling
//!
//! Defines error types and handling for the file vault.

pub mod handlers;
pub mod types;

pub use types::*;
