use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use quiktix_core::{AuthenticatedUser, CoreError, CoreResult, IdentityResolver};
use quiktix_store::app_config::AuthConfig;

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// JWT Claims
// ============================================================================

/// Access-token claims issued by the identity provider
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserClaims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    pub aud: String,
    pub exp: usize,
    #[serde(default)]
    pub role: Option<String>,
}

/// HS256 verification against the provider's shared secret
pub struct JwtIdentityResolver {
    key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityResolver {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[config.jwt_audience.as_str()]);

        Self {
            key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl IdentityResolver for JwtIdentityResolver {
    async fn resolve(&self, credential: &str) -> CoreResult<AuthenticatedUser> {
        let token_data = decode::<UserClaims>(credential, &self.key, &self.validation)
            .map_err(|e| CoreError::IdentityError(e.to_string()))?;

        let id = Uuid::parse_str(&token_data.claims.sub)
            .map_err(|_| CoreError::IdentityError("Token subject is not a user id".to_string()))?;

        Ok(AuthenticatedUser {
            id,
            email: token_data.claims.email,
        })
    }
}

// ============================================================================
// Identity Middleware
// ============================================================================

/// Who is calling, if anyone. Inserted into every request by `identity_middleware`.
#[derive(Debug, Clone, Default)]
pub struct Identity(pub Option<AuthenticatedUser>);

impl Identity {
    pub fn user(&self) -> Option<&AuthenticatedUser> {
        self.0.as_ref()
    }

    pub fn require(&self) -> Result<&AuthenticatedUser, AppError> {
        self.user()
            .ok_or_else(|| AppError::AuthenticationError("Please log in to continue.".to_string()))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim().to_owned())
}

/// Anonymous requests pass through without an identity; a token that does not
/// verify is rejected outright.
pub async fn identity_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = match bearer_token(req.headers()) {
        Some(token) => Some(
            state
                .identity
                .resolve(&token)
                .await
                .map_err(|e| AppError::AuthenticationError(e.to_string()))?,
        ),
        None => None,
    };

    req.extensions_mut().insert(Identity(user));

    Ok(next.run(req).await)
}
