//! Session management
//!
//! Cookie-backed sessions, flash messages and the gate that guards
//! authenticated routes.

pub mod gate;
pub mod registry;
pub mod state;

pub use gate::{AuthContext, SESSION_COOKIE, require_login, session_cookie, session_token};
pub use registry::SessionRegistry;
pub use state::{Flash, FlashKind, Session};
