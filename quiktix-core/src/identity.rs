use serde::{Deserialize, Serialize};
use async_trait::async_trait;
use uuid::Uuid;

use crate::CoreResult;

/// The signed-in user on whose behalf a request runs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: Option<String>,
}

impl AuthenticatedUser {
    pub fn new(id: Uuid) -> Self {
        Self { id, email: None }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Verify a bearer credential issued by the identity provider and extract the user
    async fn resolve(&self, credential: &str) -> CoreResult<AuthenticatedUser>;
}
