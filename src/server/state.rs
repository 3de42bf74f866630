//! Shared application state handed to every handler.

use std::path::Path;
use std::sync::Arc;

use crate::auth::Credentials;
use crate::config::AppConfig;
use crate::session::SessionRegistry;
use crate::storage::{StorageGateway, UploadPolicy};

#[derive(Debug, Clone)]
pub struct AppState {
    pub gateway: Arc<StorageGateway>,
    pub policy: Arc<UploadPolicy>,
    pub sessions: Arc<SessionRegistry>,
    pub credentials: Arc<Credentials>,
    pub max_input_length: usize,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            gateway: Arc::new(StorageGateway::new(config.server.storage_root_path())),
            policy: Arc::new(config.upload.policy()),
            sessions: Arc::new(SessionRegistry::new(config.server.session_ttl())),
            credentials: Arc::new(Credentials::from(&config.auth)),
            max_input_length: config.auth.max_input_length,
        }
    }

    pub fn storage_root(&self) -> &Path {
        self.gateway.root()
    }
}
