use crate::models::User;

/// Observable session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    /// The signed-in user, `None` when logged out
    pub session: Option<User>,
    /// True from construction until the first `initialize` completes
    pub is_loading: bool,
}

impl AuthState {
    /// State at process start, before the persisted session is read
    pub fn initial() -> Self {
        Self {
            session: None,
            is_loading: true,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn phase(&self) -> AuthPhase {
        AuthPhase::from(self)
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::initial()
    }
}

/// State-machine view of `AuthState`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthPhase {
    Uninitialized,
    LoggedOut,
    LoggedIn(User),
}

impl From<&AuthState> for AuthPhase {
    fn from(state: &AuthState) -> Self {
        match (&state.session, state.is_loading) {
            (_, true) => AuthPhase::Uninitialized,
            (None, false) => AuthPhase::LoggedOut,
            (Some(user), false) => AuthPhase::LoggedIn(user.clone()),
        }
    }
}
