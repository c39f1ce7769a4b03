use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::state::{AuthPhase, AuthState};
use crate::api::{AuthError, CredentialService, SignInResponse};
use crate::models::User;
use crate::storage::{KeyValueStore, StorageError};

/// Storage key holding the JSON-encoded `User`
pub const USER_KEY: &str = "user";

/// Single source of truth for the signed-in user.
///
/// Created once at startup in the loading state. `initialize` reads the
/// persisted session; `sign_in` and `sign_out` mutate it and keep the
/// key-value store in step. All writes go through one `watch::Sender`, which
/// serializes them and pushes every change to subscribers.
///
/// Concurrent `sign_in`/`sign_out` calls are not serialized against each
/// other: whichever finishes last wins. Storage writes happen under the same
/// lock as publishing, so the persisted user always matches the published one.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    service: Arc<dyn CredentialService>,
    state: watch::Sender<AuthState>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStore>, service: Arc<dyn CredentialService>) -> Self {
        let (state, _) = watch::channel(AuthState::initial());
        Self {
            storage,
            service,
            state,
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn session(&self) -> Option<User> {
        self.state.borrow().session.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn phase(&self) -> AuthPhase {
        self.state.borrow().phase()
    }

    /// Receive every future state change. The current value is marked seen.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Restore the persisted session and leave the loading state.
    ///
    /// Corrupted data is deleted and treated as "logged out". Only the first
    /// call has any effect.
    pub fn initialize(&self) {
        if !self.state.borrow().is_loading {
            debug!("Session store already initialized");
            return;
        }

        let persisted = self.load_persisted();
        let restored = persisted.is_some();

        let applied = self.state.send_if_modified(|state| {
            if !state.is_loading {
                return false;
            }
            state.session = persisted;
            state.is_loading = false;
            true
        });

        if applied {
            info!(restored, "Session store initialized");
        }
    }

    /// Authenticate, persist the user, then publish it.
    ///
    /// A service rejection is returned unchanged and leaves state untouched.
    /// A persist failure is returned and the user is not published.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let SignInResponse { user, token } = match self.service.sign_in(email, password).await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(error = %e, "Sign-in failed");
                return Err(e);
            }
        };

        // Token-less session model: the token is not kept.
        debug!(token_len = token.len(), "Dropping session token");

        // Persist under the channel's write lock so overlapping calls publish
        // in the same order they hit storage.
        let user_id = user.id.clone();
        let mut persisted = Ok(());
        self.state.send_if_modified(|state| {
            persisted = self.persist(&user);
            if persisted.is_ok() {
                state.session = Some(user);
            }
            persisted.is_ok()
        });
        persisted?;

        info!(%user_id, "Signed in");
        Ok(())
    }

    /// Clear the session locally no matter what the remote call does.
    pub async fn sign_out(&self) {
        if let Err(e) = self.service.sign_out().await {
            warn!(error = %e, "Remote sign-out failed, clearing local session anyway");
        }

        self.state.send_modify(|state| {
            if let Err(e) = self.storage.remove(USER_KEY) {
                warn!(error = %e, "Failed to remove persisted session");
            }
            state.session = None;
        });
        info!("Signed out");
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    fn persist(&self, user: &User) -> Result<(), AuthError> {
        let json = user.to_json()?;
        self.storage.set(USER_KEY, &json)?;
        Ok(())
    }

    fn load_persisted(&self) -> Option<User> {
        let raw = match self.storage.get(USER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(StorageError::NotUtf8(_)) => {
                self.discard_corrupted("not UTF-8");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read persisted session");
                return None;
            }
        };

        match User::from_json(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                self.discard_corrupted(&e.to_string());
                None
            }
        }
    }

    fn discard_corrupted(&self, reason: &str) {
        warn!(reason, "Discarding corrupted persisted session");
        if let Err(e) = self.storage.remove(USER_KEY) {
            warn!(error = %e, "Failed to remove corrupted session");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
