use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppResult, Violations};

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request body for obtaining a token pair.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub token: String,
}

/// Response returned after register, login or refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: PublicUser,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

pub const MIN_PASSWORD_LEN: usize = 8;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9@.+_-]{3,150}$").unwrap();
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_username(username: &str) -> bool {
    USERNAME_RE.is_match(username)
}

impl RegisterRequest {
    /// Trims and lowercases the email, then checks every field.
    pub fn normalize(mut self) -> AppResult<Self> {
        self.username = self.username.trim().to_string();
        self.email = self.email.trim().to_lowercase();

        let mut v = Violations::default();
        v.check(
            is_valid_username(&self.username),
            "username",
            "3-150 letters, digits or @.+-_",
        );
        v.check(is_valid_email(&self.email), "email", "invalid email");
        v.check(
            self.password.chars().count() >= MIN_PASSWORD_LEN,
            "password",
            "must be at least 8 characters",
        );
        v.finish()?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("cook@example.com"));
        assert!(!is_valid_email("cook@example"));
        assert!(!is_valid_email("co ok@example.com"));
    }

    #[test]
    fn username_shapes() {
        assert!(is_valid_username("jane.doe+food"));
        assert!(!is_valid_username("jd"));
        assert!(!is_valid_username("jane doe"));
        assert!(!is_valid_username(&"a".repeat(151)));
    }

    #[test]
    fn register_normalizes_email() {
        let req = RegisterRequest {
            username: " jane ".into(),
            email: "  Jane@Example.COM ".into(),
            password: "longenough".into(),
        }
        .normalize()
        .unwrap();
        assert_eq!(req.username, "jane");
        assert_eq!(req.email, "jane@example.com");
    }

    #[test]
    fn register_reports_all_bad_fields() {
        let err = RegisterRequest {
            username: "x".into(),
            email: "nope".into(),
            password: "short".into(),
        }
        .normalize()
        .unwrap_err();
        match err {
            AppError::Validation(fields) => {
                let names: Vec<_> = fields.iter().map(|f| f.field).collect();
                assert_eq!(names, vec!["username", "email", "password"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn public_user_serialization() {
        let user = PublicUser {
            id: Uuid::new_v4(),
            username: "jane".into(),
            email: "jane@example.com".into(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("jane@example.com"));
        assert!(json.contains("\"username\":\"jane\""));
    }
}
