use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Json, Response},
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;

const TOKEN_DURATION_SECS: i64 = 24 * 3600; // 24 hours

/// JWT claims stored in an API bearer token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub jti: String,
}

/// JWT service for creating and verifying API tokens.
/// Token minting happens out-of-band (ops tooling, tests); the server
/// only verifies.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl JwtService {
    pub fn new(secret: &str, issuer: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
        }
    }

    /// Create a token whose `sub` claim is the user's id.
    pub fn create_token(&self, user_id: Uuid) -> Result<String> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: now.timestamp() + TOKEN_DURATION_SECS,
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };
        encode(&Header::default(), &claims, &self.encoding_key).map_err(Into::into)
    }

    /// Verify and decode a token. Returns claims if valid and not expired.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(Into::into)
    }
}

/// The authenticated API caller. Extract this in handlers that mutate
/// state; the identity it carries is what gets persisted as host or
/// reviewer, never anything from the request body.
pub struct AuthUser {
    pub user_id: Uuid,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| unauthorized("Missing bearer token"))?;

        let claims = state
            .jwt
            .verify_token(token)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| unauthorized("Malformed token subject"))?;

        Ok(AuthUser { user_id })
    }
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_token() {
        let jwt = JwtService::new("test-secret", "wayfare".to_string());
        let user_id = Uuid::new_v4();
        let token = jwt.create_token(user_id).unwrap();
        let claims = jwt.verify_token(&token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.iss, "wayfare");
    }

    #[test]
    fn rejects_wrong_secret() {
        let jwt_a = JwtService::new("secret-a", "wayfare".to_string());
        let jwt_b = JwtService::new("secret-b", "wayfare".to_string());
        let token = jwt_a.create_token(Uuid::new_v4()).unwrap();
        assert!(jwt_b.verify_token(&token).is_err());
    }

    #[test]
    fn rejects_wrong_issuer() {
        let minter = JwtService::new("secret", "someone-else".to_string());
        let verifier = JwtService::new("secret", "wayfare".to_string());
        let token = minter.create_token(Uuid::new_v4()).unwrap();
        assert!(verifier.verify_token(&token).is_err());
    }
}
