//! Authentication system
//!
//! Handles credential storage and login validation.

pub mod credentials;
pub mod validator;

pub use credentials::Credentials;
pub use validator::validate_login;
