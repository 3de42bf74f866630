//! Session registry
//!
//! In-memory store of live sessions keyed by their cookie token.

use log::{debug, info};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::session::state::{Flash, Session};

/// Registry for tracking live sessions
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, Session>>,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    fn new_token() -> String {
        Uuid::new_v4().to_string()
    }

    fn expiry(&self) -> Instant {
        Instant::now() + self.ttl
    }

    /// Creates an authenticated session, dropping the previous one if any.
    ///
    /// A fresh token is issued on every login so a token planted before
    /// authentication is never promoted.
    pub async fn login(&self, previous: Option<&str>, username: &str) -> String {
        let token = Self::new_token();
        let mut sessions = self.sessions.lock().await;
        if let Some(previous) = previous {
            sessions.remove(previous);
        }
        sessions.insert(
            token.clone(),
            Session::authenticated(username.to_string(), self.expiry()),
        );
        info!("Session started for {} ({} live)", username, sessions.len());
        token
    }

    /// Destroys the session behind `token` and returns a fresh anonymous
    /// token carrying `flash`.
    pub async fn logout(&self, token: &str, flash: Flash) -> String {
        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.remove(token) {
            info!("Session ended for {}", session.username().unwrap_or("anonymous"));
        }
        let anonymous_token = Self::new_token();
        let mut anonymous = Session::anonymous(self.expiry());
        anonymous.push_flash(flash);
        sessions.insert(anonymous_token.clone(), anonymous);
        anonymous_token
    }

    /// Returns the username of a live, authenticated session.
    pub async fn authenticate(&self, token: &str) -> Option<String> {
        let mut sessions = self.sessions.lock().await;
        Self::prune(&mut sessions);
        sessions
            .get(token)
            .and_then(|session| session.username())
            .map(str::to_string)
    }

    /// Queues a flash message on an existing session.
    pub async fn push_flash(&self, token: &str, flash: Flash) {
        let mut sessions = self.sessions.lock().await;
        match sessions.get_mut(token) {
            Some(session) => session.push_flash(flash),
            None => debug!("Dropping flash for unknown session"),
        }
    }

    /// Drains pending flash messages for a session.
    pub async fn take_flashes(&self, token: &str) -> Vec<Flash> {
        let mut sessions = self.sessions.lock().await;
        Self::prune(&mut sessions);
        sessions
            .get_mut(token)
            .map(Session::take_flashes)
            .unwrap_or_default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    fn prune(sessions: &mut HashMap<String, Session>) {
        let now = Instant::now();
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now));
        let pruned = before - sessions.len();
        if pruned > 0 {
            debug!("Pruned {} expired sessions", pruned);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_login_then_authenticate() {
        let registry = SessionRegistry::new(Duration::from_secs(60));
        let token = registry.login(None, "admin").await;
        assert_eq!(registry.authenticate(&token).await.as_deref(), Some("admin"));
        assert_eq!(registry.authenticate("bogus").await, None);
    }

    #[tokio::test]
    async fn test_login_rotates_previous_token() {
        let registry = SessionRegistry::new(Duration::from_secs(60));
        let first = registry.login(None, "admin").await;
        let second = registry.login(Some(&first), "admin").await;
        assert_ne!(first, second);
        assert_eq!(registry.authenticate(&first).await, None);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_logout_leaves_anonymous_flash_session() {
        let registry = SessionRegistry::new(Duration::from_secs(60));
        let token = registry.login(None, "admin").await;
        let anonymous = registry
            .logout(&token, Flash::success("Successfully logged out!"))
            .await;

        assert_eq!(registry.authenticate(&token).await, None);
        assert_eq!(registry.authenticate(&anonymous).await, None);
        assert_eq!(
            registry.take_flashes(&anonymous).await,
            vec![Flash::success("Successfully logged out!")]
        );
        assert!(registry.take_flashes(&anonymous).await.is_empty());
    }

    #[tokio::test]
    async fn test_expired_sessions_are_rejected() {
        let registry = SessionRegistry::new(Duration::ZERO);
        let token = registry.login(None, "admin").await;
        assert_eq!(registry.authenticate(&token).await, None);
        assert_eq!(registry.len().await, 0);
    }

    #[tokio::test]
    async fn test_flashes_are_queued_in_order() {
        let registry = SessionRegistry::new(Duration::from_secs(60));
        let token = registry.login(None, "admin").await;
        registry.push_flash(&token, Flash::success("one")).await;
        registry.push_flash(&token, Flash::error("two")).await;
        assert_eq!(
            registry.take_flashes(&token).await,
            vec![Flash::success("one"), Flash::error("two")]
        );
    }
}
