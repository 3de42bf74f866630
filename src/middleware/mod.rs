//! Server middleware
//!
//! Provides request logging and security header middleware.

pub mod logging;
pub mod security;

pub use logging::log_request;
pub use security::add_security_headers;
