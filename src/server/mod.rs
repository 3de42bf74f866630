//! Server core functionality
//!
//! This module contains the HTTP server, its router, shared state and
//! request handlers.

pub mod core;
pub mod handlers;
pub mod state;

pub use self::core::{Server, router};
pub use state::AppState;
