//! Authentication validator
//!
//! Checks login form input against the configured credentials.

use super::credentials::Credentials;
use crate::error::AuthError;

/// Performs basic input sanitation to check for malicious or malformed usernames/passwords.
fn is_valid_input(input: &str, max_length: usize) -> bool {
    !input.trim().is_empty() && input.len() <= max_length && !input.contains(['\r', '\n', '\0'])
}

/// Validates a login attempt, returning the authenticated username.
pub fn validate_login(
    credentials: &Credentials,
    username: &str,
    password: &str,
    max_length: usize,
) -> Result<String, AuthError> {
    if !is_valid_input(username, max_length) {
        return Err(AuthError::MalformedInput("Invalid username format".into()));
    }

    if !is_valid_input(password, max_length) {
        return Err(AuthError::MalformedInput("Invalid password format".into()));
    }

    if credentials.matches(username, password) {
        Ok(credentials.username().to_string())
    } else {
        Err(AuthError::InvalidCredentials(username.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> Credentials {
        Credentials::new("admin", "secure_password_123")
    }

    #[test]
    fn test_valid_login() {
        assert_eq!(
            validate_login(&creds(), "admin", "secure_password_123", 128),
            Ok("admin".to_string())
        );
    }

    #[test]
    fn test_wrong_password_or_user() {
        assert_eq!(
            validate_login(&creds(), "admin", "wrongpassword", 128),
            Err(AuthError::InvalidCredentials("admin".into()))
        );
        assert_eq!(
            validate_login(&creds(), "bob", "secure_password_123", 128),
            Err(AuthError::InvalidCredentials("bob".into()))
        );
    }

    #[test]
    fn test_malformed_input() {
        assert!(matches!(
            validate_login(&creds(), "  ", "x", 128),
            Err(AuthError::MalformedInput(_))
        ));
        assert!(matches!(
            validate_login(&creds(), "admin\r\n", "x", 128),
            Err(AuthError::MalformedInput(_))
        ));
        assert!(matches!(
            validate_login(&creds(), "admin", &"p".repeat(200), 128),
            Err(AuthError::MalformedInput(_))
        ));
    }
}
