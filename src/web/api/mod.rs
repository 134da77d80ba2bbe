//! API endpoints module.

pub mod auth;
pub mod session;
pub mod settings;

pub use auth::{login, register};
pub use session::logout_whatsapp;
pub use settings::{save_instructions, save_toggles};

use serde::Serialize;

/// Boundary response: validation failures are data, not HTTP errors.
#[derive(Serialize, Debug)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl ApiResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            user: None,
            msg: None,
        }
    }

    pub fn ok_user(user: impl Into<String>) -> Self {
        Self {
            success: true,
            user: Some(user.into()),
            msg: None,
        }
    }

    pub fn fail(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            user: None,
            msg: Some(msg.into()),
        }
    }

    pub fn failed() -> Self {
        Self {
            success: false,
            user: None,
            msg: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_are_omitted() {
        let json = serde_json::to_string(&ApiResponse::ok()).unwrap();
        assert_eq!(json, r#"{"success":true}"#);

        let json = serde_json::to_string(&ApiResponse::fail("User exists")).unwrap();
        assert_eq!(json, r#"{"success":false,"msg":"User exists"}"#);

        let json = serde_json::to_string(&ApiResponse::ok_user("alice")).unwrap();
        assert_eq!(json, r#"{"success":true,"user":"alice"}"#);
    }
}
