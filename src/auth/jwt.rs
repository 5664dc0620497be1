//! HS256 access tokens.

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Role, User};
use crate::utils::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account email.
    pub sub: String,
    pub uid: Uuid,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

#[derive(Clone)]
pub struct TokenService {
    keys: Arc<Keys>,
    lifetime_secs: i64,
}

impl TokenService {
    pub fn new(secret: &[u8], lifetime_secs: i64) -> Self {
        Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret),
                decoding: DecodingKey::from_secret(secret),
            }),
            lifetime_secs,
        }
    }

    pub fn issue(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.email.clone(),
            uid: user.id,
            role: user.role,
            iat: now,
            exp: now + self.lifetime_secs,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .map_err(|e| AppError::InternalServerError(format!("failed to encode token: {e}")))
    }

    /// Checks signature and expiry.
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);

        jsonwebtoken::decode::<Claims>(token, &self.keys.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected bearer token");
                AppError::AuthError("Invalid or expired token".to_string())
            })
    }
}
