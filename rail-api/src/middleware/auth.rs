use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppError;
use crate::state::AuthConfig;

// ============================================================================
// JWT Claims
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Admins may do anything a user may do.
    pub fn grants(self, required: Role) -> bool {
        match required {
            Role::User => true,
            Role::Admin => self == Role::Admin,
        }
    }
}

/// Identity of the caller, issued by the external identity provider.
/// `sub` is the user id tickets are booked under.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub exp: usize,
}

pub fn issue_token(secret: &str, sub: &str, role: Role, ttl: Duration) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: sub.to_owned(),
        role,
        exp: (Utc::now() + ttl).timestamp() as usize,
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
}

// ============================================================================
// Role Guard
// ============================================================================

/// Route-level guard: the request must carry a valid bearer token whose role
/// grants `required`. The decoded [`Claims`] are handed to the handler as a
/// request extension.
#[derive(Clone)]
pub struct RoleGuard {
    secret: Arc<str>,
    required: Role,
}

impl RoleGuard {
    pub fn new(auth: &AuthConfig, required: Role) -> Self {
        Self {
            secret: auth.secret.clone(),
            required,
        }
    }
}

pub async fn enforce_role(
    State(guard): State<RoleGuard>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let bearer = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or_else(|| AppError::Authentication("Missing bearer token".to_string()))?;

    let token_data = decode::<Claims>(
        bearer.token(),
        &DecodingKey::from_secret(guard.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        debug!("Rejected bearer token: {}", e);
        AppError::Authentication("Invalid bearer token".to_string())
    })?;

    if !token_data.claims.role.grants(guard.required) {
        debug!("Role {:?} denied; {:?} required", token_data.claims.role, guard.required);
        return Err(AppError::Authorization("Insufficient role".to_string()));
    }

    req.extensions_mut().insert(token_data.claims);

    Ok(next.run(req).await)
}
