//! CLI command implementations.

pub mod auth;
pub mod cart;
pub mod products;
pub mod watch;

use thiserror::Error;

use qkart_storefront::{Operation, StorefrontClient, StorefrontError};

use crate::session_store::{SessionStore, SessionStoreError};

/// Shared handles every command needs.
pub struct Context {
    pub client: StorefrontClient,
    pub sessions: SessionStore,
}

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A storefront operation failed; `message` is what the user sees.
    #[error("{message}")]
    Storefront {
        operation: Operation,
        message: String,
        #[source]
        source: StorefrontError,
    },

    #[error("failed to initialize HTTP client: {0}")]
    Setup(#[source] StorefrontError),

    #[error(transparent)]
    SessionStore(#[from] SessionStoreError),

    #[error("failed to read input: {0}")]
    Input(#[from] std::io::Error),
}

impl CommandError {
    /// Adapter for `map_err` that tags a storefront error with its operation.
    pub fn storefront(operation: Operation) -> impl FnOnce(StorefrontError) -> Self {
        move |source| Self::Storefront {
            operation,
            message: source.user_message(operation),
            source,
        }
    }

    /// Whether the failure was a pre-flight rejection rather than an error.
    #[must_use]
    pub const fn is_warning(&self) -> bool {
        match self {
            Self::Storefront { source, .. } => source.is_warning(),
            Self::Setup(_) | Self::SessionStore(_) | Self::Input(_) => false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_storefront_error_shows_user_message() {
        let err = CommandError::storefront(Operation::UpdateCart)(StorefrontError::DuplicateItem);
        assert_eq!(
            err.to_string(),
            "Item already in Cart. Use the Cart sidebar to update quantity or remove item."
        );
        assert!(err.is_warning());
    }

    #[test]
    fn test_transport_errors_are_not_warnings() {
        let parse_error = serde_json::from_str::<Vec<u8>>("<html>").unwrap_err();
        let err =
            CommandError::storefront(Operation::FetchProducts)(StorefrontError::Parse(parse_error));
        assert_eq!(
            err.to_string(),
            "Error fetching products. Please try again later."
        );
        assert!(!err.is_warning());
    }
}
