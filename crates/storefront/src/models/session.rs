//! Session context.
//!
//! A [`Session`] is what a successful login yields. Operations that need
//! authentication take it as an explicit argument instead of reading it
//! from process-wide storage; "logged out" is simply the absence of one.

use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};

/// Logged-in user identity and wallet state.
///
/// `Debug` output redacts the token.
#[derive(Debug, Clone)]
pub struct Session {
    token: SecretString,
    username: String,
    balance: Decimal,
}

impl Session {
    /// Create a session from login data.
    #[must_use]
    pub const fn new(token: SecretString, username: String, balance: Decimal) -> Self {
        Self {
            token,
            username,
            balance,
        }
    }

    /// Bearer token for authenticated requests.
    #[must_use]
    pub const fn token(&self) -> &SecretString {
        &self.token
    }

    /// Name the user is logged in as.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Wallet balance reported at login.
    #[must_use]
    pub const fn balance(&self) -> Decimal {
        self.balance
    }

    /// `Authorization` header value for this session.
    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.token.expose_secret())
    }
}
