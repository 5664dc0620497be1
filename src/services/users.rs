use std::sync::Arc;

use tracing::{info, warn};
use validator::Validate;

use crate::auth::password::{hash_password, verify_password};
use crate::models::{LoginRequest, NewUser, RegisterRequest, Role, User};
use crate::store::Store;
use crate::utils::error::{AppError, AppResult};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Emails are compared case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn Store>,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    async fn register(&self, request: RegisterRequest, role: Role) -> AppResult<User> {
        request.validate()?;

        let email = normalize_email(&request.email);
        if self.store.email_exists(&email).await? {
            warn!(email = %email, "Registration with existing email");
            return Err(AppError::Conflict("Email is already registered".to_string()));
        }

        let user = self
            .store
            .insert_user(NewUser {
                email,
                password_hash: hash_password(&request.password)?,
                role,
                name: request.username.trim().to_string(),
            })
            .await?;

        info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    pub async fn register_user(&self, request: RegisterRequest) -> AppResult<User> {
        self.register(request, Role::User).await
    }

    pub async fn register_admin(&self, request: RegisterRequest) -> AppResult<User> {
        self.register(request, Role::Admin).await
    }

    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, request: LoginRequest) -> AppResult<User> {
        request.validate()?;

        let email = normalize_email(&request.email);
        let user = self.store.find_user_by_email(&email).await?;

        match user {
            Some(user) if verify_password(&request.password, &user.password_hash) => {
                info!(user_id = %user.id, "User logged in");
                Ok(user)
            }
            _ => {
                warn!(email = %email, "Failed login attempt");
                Err(AppError::AuthError(INVALID_CREDENTIALS.to_string()))
            }
        }
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<User> {
        self.store
            .find_user_by_email(&normalize_email(email))
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {email} not found")))
    }
}
