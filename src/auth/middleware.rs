// Authentication extractor shared by every protected route

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::auth::{models::Principal, token::TokenService};
use crate::error::ApiError;

/// Pull the raw token out of an `Authorization: Bearer <token>` header
pub fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let endpoint = parts.uri.path();

    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| {
            debug!("Missing Authorization header for endpoint: {}", endpoint);
            ApiError::MissingCredential
        })?
        .to_str()
        .map_err(|_| {
            warn!("Invalid Authorization header encoding for endpoint: {}", endpoint);
            ApiError::Unauthenticated("non-ascii authorization header".to_string())
        })?;

    auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        warn!(
            "Authorization header missing 'Bearer ' prefix for endpoint: {}",
            endpoint
        );
        ApiError::Unauthenticated("missing Bearer prefix".to_string())
    })
}

/// Handlers take a `Principal` argument to require authentication.
/// Verification uses the token service from application state, so the secret
/// is never re-read per request.
#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    Arc<TokenService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let token_service = Arc::<TokenService>::from_ref(state);
        let principal = token_service.verify(token)?;

        debug!(
            "Authenticated user_id={} role={} endpoint={}",
            principal.user_id,
            principal.role,
            parts.uri.path()
        );
        Ok(principal)
    }
}
