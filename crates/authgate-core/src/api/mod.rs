//! Credential services.
//!
//! The session store talks to a `CredentialService`, which either accepts an
//! email/password pair and hands back a user record plus an opaque token, or
//! rejects it. Two implementations ship:
//! - `MockCredentialService`: simulated latency, accepts anything
//! - `HttpCredentialService`: JSON over HTTP against a real backend

pub mod client;
pub mod error;
pub mod mock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::User;

pub use client::HttpCredentialService;
pub use error::AuthError;
pub use mock::MockCredentialService;

/// Successful sign-in payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInResponse {
    pub user: User,
    pub token: String,
}

#[async_trait]
pub trait CredentialService: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SignInResponse, AuthError>;

    /// Best effort. Callers must not depend on this succeeding.
    async fn sign_out(&self) -> Result<(), AuthError>;
}
