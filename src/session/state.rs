//! Module `state`
//!
//! Defines the `Session` struct: whether the browser behind a session cookie
//! has logged in, as whom, and which flash messages are waiting for it.

use std::time::Instant;

/// Category of a flash message, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashKind::Success => "success",
            FlashKind::Error => "error",
        }
    }
}

/// One-shot message shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}

/// Server-side state behind a session cookie.
#[derive(Debug, Clone)]
pub struct Session {
    username: Option<String>,
    flashes: Vec<Flash>,
    expires_at: Instant,
}

impl Session {
    /// An unauthenticated session, used to carry flash messages.
    pub fn anonymous(expires_at: Instant) -> Self {
        Self {
            username: None,
            flashes: Vec::new(),
            expires_at,
        }
    }

    pub fn authenticated(username: String, expires_at: Instant) -> Self {
        Self {
            username: Some(username),
            flashes: Vec::new(),
            expires_at,
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    pub fn push_flash(&mut self, flash: Flash) {
        self.flashes.push(flash);
    }

    /// Removes and returns all pending flash messages.
    pub fn take_flashes(&mut self) -> Vec<Flash> {
        std::mem::take(&mut self.flashes)
    }
}
