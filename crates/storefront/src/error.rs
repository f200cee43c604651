//! Unified error handling for storefront operations.
//!
//! Every client operation returns `Result<T, StorefrontError>`. Errors carry
//! enough detail for logging; [`StorefrontError::user_message`] turns them
//! into the text a shopper should see, hiding transport details behind a
//! per-operation fallback.

use reqwest::StatusCode;
use thiserror::Error;

/// Shown when a cart update is attempted without a session.
pub const LOGIN_REQUIRED_MESSAGE: &str = "Login to add an item to the Cart";

/// Shown when the cart is requested without a session.
pub const LOGIN_TO_VIEW_CART_MESSAGE: &str = "Login to view your Cart";

/// Shown when "Add to Cart" is pressed for a product already in the cart.
pub const DUPLICATE_ITEM_MESSAGE: &str =
    "Item already in Cart. Use the Cart sidebar to update quantity or remove item.";

/// Storefront client error type.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// The operation needs a logged-in session and none was supplied.
    #[error("Authentication required")]
    AuthenticationRequired,

    /// Input failed client-side validation; the message is user-facing.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// "Add to Cart" for a product that already has a cart line.
    #[error("Item already in cart")]
    DuplicateItem,

    /// HTTP request failed (connection refused, timeout, bad body).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend rejected the request with a 4xx status and a message.
    #[error("Backend rejected request ({status}): {message}")]
    Rejected {
        /// HTTP status returned by the backend.
        status: StatusCode,
        /// Message from the backend's `{success: false, message}` body.
        message: String,
    },

    /// Backend returned a non-success status without a usable message.
    #[error("Unexpected status: {0}")]
    Status(StatusCode),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The user-facing operation an error came from.
///
/// Selects the generic fallback message for errors that should not be
/// shown verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FetchProducts,
    SearchProducts,
    FetchCart,
    UpdateCart,
    Login,
    Register,
}

impl Operation {
    /// Message shown when this operation needs a session and has none.
    #[must_use]
    pub const fn login_required_message(self) -> &'static str {
        match self {
            Self::FetchCart => LOGIN_TO_VIEW_CART_MESSAGE,
            _ => LOGIN_REQUIRED_MESSAGE,
        }
    }

    /// Generic message shown when no better explanation is available.
    #[must_use]
    pub const fn fallback_message(self) -> &'static str {
        match self {
            Self::FetchProducts | Self::SearchProducts => {
                "Error fetching products. Please try again later."
            }
            Self::FetchCart => {
                "Could not fetch cart details. Check that the backend is running, reachable and returns valid JSON."
            }
            Self::UpdateCart => "Error adding item to Cart. Please try again later.",
            Self::Login | Self::Register => {
                "Something went wrong. Check that the backend is running, reachable and returns valid JSON"
            }
        }
    }
}

impl StorefrontError {
    /// Text to show the user for an error raised by `operation`.
    ///
    /// Validation and backend-rejection messages pass through unchanged;
    /// transport, status and parse failures collapse to the operation's
    /// fallback so internal details never reach the user.
    #[must_use]
    pub fn user_message(&self, operation: Operation) -> String {
        match self {
            Self::AuthenticationRequired => operation.login_required_message().to_string(),
            Self::DuplicateItem => DUPLICATE_ITEM_MESSAGE.to_string(),
            Self::Validation(message) | Self::Rejected { message, .. } => message.clone(),
            Self::Http(_) | Self::Status(_) | Self::Parse(_) => {
                operation.fallback_message().to_string()
            }
        }
    }

    /// Whether this error was caught before any network call.
    ///
    /// These are surfaced as warnings rather than errors.
    #[must_use]
    pub const fn is_warning(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationRequired | Self::Validation(_) | Self::DuplicateItem
        )
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;
