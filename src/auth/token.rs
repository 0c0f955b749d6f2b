// JWT verification (and signing for local tooling and tests)

use crate::auth::models::{Principal, Role};
use crate::error::ApiError;
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // user_id
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<Uuid>,
    pub exp: i64, // expiration timestamp
    pub iat: i64, // issued at timestamp
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            role: claims.role,
            organization_id: claims.organization_id,
        }
    }
}

/// Token service holding the process-wide HS256 secret
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_duration: i64, // in seconds
}

impl TokenService {
    /// Create a new TokenService with secret key and token lifetime in seconds
    pub fn new(secret: &str, token_duration: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            token_duration,
        }
    }

    /// Sign a token for the given principal
    pub fn issue(&self, principal: &Principal) -> Result<String, ApiError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: principal.user_id,
            role: principal.role,
            organization_id: principal.organization_id,
            iat: now,
            exp: now + self.token_duration,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ApiError::InternalError(format!("token signing failed: {}", e)))
    }

    /// Verify signature and expiry, returning the embedded principal
    pub fn verify(&self, token: &str) -> Result<Principal, ApiError> {
        if token.trim().is_empty() {
            return Err(ApiError::Unauthenticated("empty bearer token".to_string()));
        }

        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.into())
            .map_err(|e| {
                let reason = match e.kind() {
                    ErrorKind::ExpiredSignature => "token expired".to_string(),
                    ErrorKind::InvalidSignature => "signature mismatch".to_string(),
                    other => format!("malformed token: {:?}", other),
                };
                ApiError::Unauthenticated(reason)
            })
    }
}
