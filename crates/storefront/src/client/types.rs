//! Request and response bodies of the QKart REST API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use qkart_core::ProductId;

/// Body of `POST /auth/login` and `POST /auth/register`.
#[derive(Debug, Serialize)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Successful `POST /auth/login` response.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    pub token: String,
    pub username: String,
    #[serde(default)]
    pub balance: Decimal,
}

/// Successful `POST /auth/register` response.
#[derive(Debug, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub success: bool,
}

/// Body of `POST /cart`.
#[derive(Debug, Serialize)]
pub struct CartUpdateRequest<'a> {
    #[serde(rename = "productId")]
    pub product_id: &'a ProductId,
    pub qty: u32,
}

/// Error body returned by the backend: `{success: false, message}`.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_update_request_wire_format() {
        let id = ProductId::new("KCRwjF7lN97HnEaY");
        let body = CartUpdateRequest {
            product_id: &id,
            qty: 0,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"productId": "KCRwjF7lN97HnEaY", "qty": 0}));
    }

    #[test]
    fn test_login_response_parses() {
        let resp: LoginResponse = serde_json::from_str(
            r#"{"success":true,"token":"tok","username":"crio.do","balance":5000}"#,
        )
        .unwrap();
        assert!(resp.success);
        assert_eq!(resp.username, "crio.do");
        assert_eq!(resp.balance, Decimal::new(5000, 0));
    }

    #[test]
    fn test_error_body_tolerates_missing_message() {
        let body: ErrorBody = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert!(!body.success);
        assert!(body.message.is_none());
    }
}
