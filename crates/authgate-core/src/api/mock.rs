use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::{AuthError, CredentialService, SignInResponse};
use crate::models::User;

/// Simulated sign-in round trip
const SIGN_IN_LATENCY_MS: u64 = 1000;

/// Simulated sign-out round trip
const SIGN_OUT_LATENCY_MS: u64 = 500;

const MOCK_USER_ID: &str = "1";
const MOCK_TOKEN: &str = "mock-jwt-token";

/// Stand-in for a real credential backend.
///
/// Accepts any email/password pair and answers with user id `"1"` after a
/// short delay. Failures can be switched on to exercise error paths.
#[derive(Debug)]
pub struct MockCredentialService {
    sign_in_latency: Duration,
    sign_out_latency: Duration,
    reject_sign_in: bool,
    fail_sign_out: bool,
    sign_in_calls: AtomicUsize,
    sign_out_calls: AtomicUsize,
}

impl Default for MockCredentialService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCredentialService {
    pub fn new() -> Self {
        Self::with_latency(
            Duration::from_millis(SIGN_IN_LATENCY_MS),
            Duration::from_millis(SIGN_OUT_LATENCY_MS),
        )
    }

    /// No simulated latency
    pub fn instant() -> Self {
        Self::with_latency(Duration::ZERO, Duration::ZERO)
    }

    pub fn with_latency(sign_in: Duration, sign_out: Duration) -> Self {
        Self {
            sign_in_latency: sign_in,
            sign_out_latency: sign_out,
            reject_sign_in: false,
            fail_sign_out: false,
            sign_in_calls: AtomicUsize::new(0),
            sign_out_calls: AtomicUsize::new(0),
        }
    }

    /// Make every sign-in fail with `InvalidCredentials`
    pub fn rejecting_sign_in(mut self) -> Self {
        self.reject_sign_in = true;
        self
    }

    /// Make every sign-out fail
    pub fn failing_sign_out(mut self) -> Self {
        self.fail_sign_out = true;
        self
    }

    pub fn sign_in_calls(&self) -> usize {
        self.sign_in_calls.load(Ordering::SeqCst)
    }

    pub fn sign_out_calls(&self) -> usize {
        self.sign_out_calls.load(Ordering::SeqCst)
    }

    async fn simulate(latency: Duration) {
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl CredentialService for MockCredentialService {
    async fn sign_in(&self, email: &str, _password: &str) -> Result<SignInResponse, AuthError> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
        Self::simulate(self.sign_in_latency).await;

        if self.reject_sign_in {
            debug!(email, "Mock sign-in rejected");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(SignInResponse {
            user: User::new(MOCK_USER_ID, email),
            token: MOCK_TOKEN.to_string(),
        })
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        Self::simulate(self.sign_out_latency).await;

        if self.fail_sign_out {
            return Err(AuthError::Rejected("mock sign-out failure".to_string()));
        }
        Ok(())
    }
}
