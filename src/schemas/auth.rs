use serde::Serialize;

use super::{is_valid_email, FromPayload, Payload};

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl FromPayload for LoginRequest {
    fn from_payload(p: &mut Payload<'_>) -> Self {
        let email: String = p.required("email");
        if !email.is_empty() {
            p.check("email", is_valid_email(&email), "value is not a valid email address");
        }
        Self {
            email,
            password: p.required("password"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

impl LoginResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer",
        }
    }
}
