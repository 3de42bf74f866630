//! Configuration management for filevault
//!
//! Values come from an optional `config.toml`, overridden by environment
//! variables prefixed with `FILEVAULT` (sections separated by `__`, e.g.
//! `FILEVAULT_SERVER__PORT=8080`).

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::storage::UploadPolicy;
use crate::storage::policy::{DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_MAX_FILE_SIZE};

const CONFIG_PATHS: [&str; 2] = [
    "filevault/config", // container layout: /app/filevault/config.toml
    "config",           // local development: ./config.toml
];

/// Complete application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upload: UploadConfig,
    pub auth: AuthConfig,
}

/// Network binding, storage location and session lifetime
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// IP address to bind the HTTP listener
    pub bind_address: String,

    pub port: u16,

    /// Directory holding uploaded files
    pub storage_root: String,

    pub session_ttl_secs: u64,
}

/// Upload policy settings
#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    /// Maximum file upload size in MB
    pub max_file_size_mb: u64,

    /// Extensions accepted for upload, without the leading dot
    pub allowed_extensions: Vec<String>,
}

/// The single account allowed to log in
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,

    /// Longest username or password accepted on the login form
    pub max_input_length: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 5000,
                storage_root: "./uploaded_files".to_string(),
                session_ttl_secs: 3600,
            },
            upload: UploadConfig {
                max_file_size_mb: DEFAULT_MAX_FILE_SIZE / (1024 * 1024),
                allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                    .iter()
                    .map(|ext| ext.to_string())
                    .collect(),
            },
            auth: AuthConfig {
                username: "admin".to_string(),
                password: "secure_password_123".to_string(),
                max_input_length: 128,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from the first config.toml found, with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let path = CONFIG_PATHS
            .iter()
            .find(|path| PathBuf::from(format!("{path}.toml")).is_file())
            .copied();
        Self::load_from(path)
    }

    /// Load from an explicit config file (extension optional) or defaults only
    pub fn load_from(path: Option<&str>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("server.bind_address", defaults.server.bind_address)?
            .set_default("server.port", defaults.server.port as i64)?
            .set_default("server.storage_root", defaults.server.storage_root)?
            .set_default("server.session_ttl_secs", defaults.server.session_ttl_secs as i64)?
            .set_default("upload.max_file_size_mb", defaults.upload.max_file_size_mb as i64)?
            .set_default("upload.allowed_extensions", defaults.upload.allowed_extensions)?
            .set_default("auth.username", defaults.auth.username)?
            .set_default("auth.password", defaults.auth.password)?
            .set_default("auth.max_input_length", defaults.auth.max_input_length as i64)?;

        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix("FILEVAULT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("port cannot be 0".into()));
        }

        if self.server.storage_root.trim().is_empty() {
            return Err(ConfigError::Message("storage_root cannot be empty".into()));
        }

        if self.server.session_ttl_secs == 0 {
            return Err(ConfigError::Message(
                "session_ttl_secs must be greater than 0".into(),
            ));
        }

        if self.upload.max_file_size_mb == 0 {
            return Err(ConfigError::Message(
                "max_file_size_mb must be greater than 0".into(),
            ));
        }

        if self.upload.allowed_extensions.is_empty() {
            return Err(ConfigError::Message(
                "allowed_extensions cannot be empty".into(),
            ));
        }

        if self.auth.username.is_empty() || self.auth.password.is_empty() {
            return Err(ConfigError::Message(
                "auth username and password must be set".into(),
            ));
        }

        Ok(())
    }
}

impl ServerConfig {
    /// Get bind address and port as socket address
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    pub fn storage_root_path(&self) -> PathBuf {
        PathBuf::from(&self.storage_root)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

impl UploadConfig {
    /// Get maximum file size in bytes
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb * 1024 * 1024
    }

    pub fn policy(&self) -> UploadPolicy {
        UploadPolicy::new(&self.allowed_extensions, self.max_file_size_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_upload_rules() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.upload.max_file_size_bytes(), 16 * 1024 * 1024);
        let policy = config.upload.policy();
        assert!(policy.accept("a.docx", 1).is_ok());
        assert!(policy.accept("a.php", 1).is_err());
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 8081\nstorage_root = \"/tmp/vault\"\n\n[upload]\nmax_file_size_mb = 2\nallowed_extensions = [\"txt\"]\n"
        )
        .unwrap();

        let path = file.path().to_str().unwrap();
        let config = AppConfig::load_from(Some(path)).unwrap();

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.storage_root, "/tmp/vault");
        assert_eq!(config.server.bind_address, "127.0.0.1");
        assert_eq!(config.upload.max_file_size_bytes(), 2 * 1024 * 1024);
        assert_eq!(config.upload.allowed_extensions, vec!["txt".to_string()]);
        assert_eq!(config.auth.username, "admin");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.upload.allowed_extensions.clear();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.auth.password.clear();
        assert!(config.validate().is_err());
    }
}
