use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::not_blank;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => f.write_str("USER"),
            Role::Admin => f.write_str("ADMIN"),
        }
    }
}

/// Stored account. Not `Serialize`; responses go through [`UserResponse`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "email cannot exceed 255 characters")
    )]
    pub email: String,
    #[validate(length(
        min = 8,
        max = 100,
        message = "Password must be between 8 and 100 characters"
    ))]
    pub password: String,
    #[serde(alias = "name")]
    #[validate(
        custom(function = "not_blank", message = "username is required"),
        length(max = 100, message = "username cannot exceed 100 characters")
    )]
    pub username: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(
        custom(function = "not_blank", message = "email is required"),
        length(max = 255, message = "email cannot exceed 255 characters")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_accepts_name_alias() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"email":"fan@example.com","password":"hunter2hunter2","name":"Fan"}"#,
        )
        .unwrap();
        assert_eq!(req.username, "Fan");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn short_password_is_rejected() {
        let req = RegisterRequest {
            email: "fan@example.com".into(),
            password: "short".into(),
            username: "Fan".into(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn quoted_local_part_is_rejected_at_registration() {
        let req = RegisterRequest {
            email: "\"@x.y".into(),
            password: "hunter2hunter2".into(),
            username: "Fan".into(),
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn login_needs_both_credentials() {
        let req = LoginRequest {
            email: " ".into(),
            password: String::new(),
        };
        assert_eq!(req.validate().unwrap_err().field_errors().len(), 2);
    }

    #[test]
    fn response_omits_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            email: "fan@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            role: Role::User,
            name: "Fan".into(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&UserResponse::from(&user)).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"role\":\"USER\""));
    }
}
