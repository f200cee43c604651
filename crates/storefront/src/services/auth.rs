//! Authentication service.
//!
//! Validates form input before anything is sent, then delegates to the
//! backend's `/auth` endpoints.

use tracing::{info, instrument};

use crate::client::StorefrontClient;
use crate::error::{Result, StorefrontError};
use crate::models::Session;

/// Minimum username and password length for registration.
const MIN_CREDENTIAL_LENGTH: usize = 6;

/// Authentication service.
pub struct AuthService<'a> {
    client: &'a StorefrontClient,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(client: &'a StorefrontClient) -> Self {
        Self { client }
    }

    /// Login with username and password.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Validation` if a field is empty (no request
    /// is sent), `StorefrontError::Rejected` with the backend's message for
    /// wrong credentials, or a transport error.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        validate_login(username, password)?;

        let session = self.client.login(username, password).await?;
        info!(username = %session.username(), "Logged in");

        Ok(session)
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Validation` if the form is invalid (no
    /// request is sent), `StorefrontError::Rejected` with the backend's
    /// message (e.g. the username is taken), or a transport error.
    #[instrument(skip(self, password, confirm_password))]
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<()> {
        validate_registration(username, password, confirm_password)?;

        self.client.register(username, password).await?;
        info!("Registered");

        Ok(())
    }
}

/// Validate a login form.
///
/// # Errors
///
/// Returns `StorefrontError::Validation` with the message to show.
pub fn validate_login(username: &str, password: &str) -> Result<()> {
    if username.is_empty() {
        return Err(invalid("Username is a required field"));
    }
    if password.is_empty() {
        return Err(invalid("Password is a required field"));
    }
    Ok(())
}

/// Validate a registration form.
///
/// Checks run in form order and the first failure wins.
///
/// # Errors
///
/// Returns `StorefrontError::Validation` with the message to show.
pub fn validate_registration(
    username: &str,
    password: &str,
    confirm_password: &str,
) -> Result<()> {
    if username.is_empty() {
        return Err(invalid("Username is a required field"));
    }
    if username.chars().count() < MIN_CREDENTIAL_LENGTH {
        return Err(invalid(format!(
            "Username must be at least {MIN_CREDENTIAL_LENGTH} characters"
        )));
    }
    if password.is_empty() {
        return Err(invalid("Password is a required field"));
    }
    if password.chars().count() < MIN_CREDENTIAL_LENGTH {
        return Err(invalid(format!(
            "Password must be at least {MIN_CREDENTIAL_LENGTH} characters"
        )));
    }
    if password != confirm_password {
        return Err(invalid("Passwords do not match"));
    }
    Ok(())
}

fn invalid(message: impl Into<String>) -> StorefrontError {
    StorefrontError::Validation(message.into())
}
