//! Request guards for authenticated routes.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::warn;

use crate::models::{Role, User};
use crate::state::AppState;
use crate::utils::error::AppError;

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::AuthError("Missing authorization header".to_string()))?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            AppError::AuthError("Invalid authorization format. Expected 'Bearer <token>'".to_string())
        })
}

/// The account behind a valid bearer token.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let claims = state.tokens.verify(bearer_token(parts)?)?;

        let user = state.users.find_by_email(&claims.sub).await.map_err(|e| match e {
            AppError::NotFound(_) => {
                warn!(user_id = %claims.uid, "Token for unknown account");
                AppError::AuthError("Account no longer exists".to_string())
            }
            other => other,
        })?;

        if user.id != claims.uid {
            warn!(user_id = %claims.uid, "Token subject does not match account");
            return Err(AppError::AuthError("Invalid or expired token".to_string()));
        }

        Ok(Self(user))
    }
}

/// A [`CurrentUser`] with the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;

        if user.role != Role::Admin {
            warn!(user_id = %user.id, "Admin route denied");
            return Err(AppError::Forbidden("Admin role required".to_string()));
        }

        Ok(Self(user))
    }
}
