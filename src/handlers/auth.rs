use axum::extract::State;
use axum::response::Response;
use tracing::warn;

use crate::auth::CurrentUser;
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, UserResponse};
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};
use crate::utils::extract::AppJson;
use crate::utils::response::{created, success};

pub async fn register(
    State(state): State<AppState>,
    AppJson(request): AppJson<RegisterRequest>,
) -> AppResult<Response> {
    let user = state.users.register_user(request).await?;
    Ok(created(
        UserResponse::from(&user),
        "User registered successfully",
    ))
}

/// Off unless `ALLOW_ADMIN_REGISTRATION` is set.
pub async fn register_admin(
    State(state): State<AppState>,
    AppJson(request): AppJson<RegisterRequest>,
) -> AppResult<Response> {
    if !state.config.allow_admin_registration {
        warn!("Admin self-registration attempted while disabled");
        return Err(AppError::Forbidden(
            "Admin registration is disabled".to_string(),
        ));
    }

    let user = state.users.register_admin(request).await?;
    Ok(created(
        UserResponse::from(&user),
        "Admin registered successfully",
    ))
}

pub async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> AppResult<Response> {
    let user = state.users.login(request).await?;
    let token = state.tokens.issue(&user)?;

    let payload = LoginResponse {
        token,
        token_type: "Bearer",
        user: UserResponse::from(&user),
    };
    Ok(success(payload, "Login successful"))
}

pub async fn me(CurrentUser(user): CurrentUser) -> AppResult<Response> {
    Ok(success(
        UserResponse::from(&user),
        "User retrieved successfully",
    ))
}
