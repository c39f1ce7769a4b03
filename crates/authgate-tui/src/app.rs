//! Application state management for the authgate TUI.
//!
//! The `App` owns form state and the observed copy of the session. It never
//! switches screens on sign-in or sign-out itself: every store change flows
//! through `sync_auth`, which feeds the navigation guard and splash
//! controller.

use std::sync::Arc;

use authgate_core::forms::{
    can_add_email_char, can_add_password_char, SignInForm, INVALID_CREDENTIALS_MESSAGE,
};
use authgate_core::navigation::{NavigationGuard, Route, SplashController};
use authgate_core::{AuthState, Config, SessionStore};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background action channel.
/// Only one sign-in or sign-out is in flight at a time from the UI.
const CHANNEL_BUFFER_SIZE: usize = 8;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ConfirmingQuit,
    Quitting,
}

/// Sign-in form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInFocus {
    Email,
    Password,
    Button,
    SignUpLink,
}

impl SignInFocus {
    pub fn next(&self) -> Self {
        match self {
            SignInFocus::Email => SignInFocus::Password,
            SignInFocus::Password => SignInFocus::Button,
            SignInFocus::Button => SignInFocus::SignUpLink,
            SignInFocus::SignUpLink => SignInFocus::Email,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            SignInFocus::Email => SignInFocus::SignUpLink,
            SignInFocus::Password => SignInFocus::Email,
            SignInFocus::Button => SignInFocus::Password,
            SignInFocus::SignUpLink => SignInFocus::Button,
        }
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Outcomes of store actions run on spawned tasks.
enum ActionResult {
    /// Sign-in finished; the error text is only logged
    SignIn(Result<(), String>),
    /// Sign-out finished (it cannot fail)
    SignOut,
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    pub config: Config,
    pub store: Arc<SessionStore>,

    /// Last observed store state
    pub auth: AuthState,
    auth_rx: watch::Receiver<AuthState>,

    pub nav: NavigationGuard,
    pub splash: SplashController,
    pub state: AppState,

    // Sign-in form state
    pub email: String,
    pub password: String,
    pub focus: SignInFocus,
    pub sign_in_error: Option<String>,
    pub is_submitting: bool,

    pub is_signing_out: bool,

    // Background task channel
    action_rx: mpsc::Receiver<ActionResult>,
    action_tx: mpsc::Sender<ActionResult>,

    pub status_message: Option<String>,
}

impl App {
    pub fn new(config: Config, store: Arc<SessionStore>) -> Self {
        let auth_rx = store.subscribe();
        let auth = auth_rx.borrow().clone();
        let (action_tx, action_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let email = config.last_email.clone().unwrap_or_default();
        let focus = if email.is_empty() {
            SignInFocus::Email
        } else {
            SignInFocus::Password
        };

        Self {
            config,
            store,
            auth,
            auth_rx,
            nav: NavigationGuard::new(),
            splash: SplashController::new(),
            state: AppState::Normal,
            email,
            password: String::new(),
            focus,
            sign_in_error: None,
            is_submitting: false,
            is_signing_out: false,
            action_rx,
            action_tx,
            status_message: None,
        }
    }

    /// Read the persisted session and apply the resulting state.
    pub fn start(&mut self) {
        self.store.initialize();
        self.sync_auth();
    }

    pub fn current_route(&self) -> Option<Route> {
        self.nav.current()
    }

    // =========================================================================
    // Session observation
    // =========================================================================

    /// Pull the latest store state and let the guard and splash react.
    /// Returns true if anything changed.
    pub fn sync_auth(&mut self) -> bool {
        match self.auth_rx.has_changed() {
            Ok(true) => {}
            // Nothing new, but the guard may not have seen the current value yet
            Ok(false) if self.nav.current().is_some() || self.auth.is_loading => return false,
            Ok(false) => {}
            Err(_) => return false,
        }

        self.auth = self.auth_rx.borrow_and_update().clone();

        if self.splash.observe(&self.auth) {
            debug!("Session loaded");
        }

        let redirected = self.nav.sync(&self.auth);
        if redirected {
            self.on_route_change();
        }
        true
    }

    fn on_route_change(&mut self) {
        match self.nav.current() {
            Some(Route::SignIn) => {
                self.password.clear();
                self.sign_in_error = None;
                self.focus = if self.email.is_empty() {
                    SignInFocus::Email
                } else {
                    SignInFocus::Password
                };
            }
            Some(Route::Home) => {
                self.password.clear();
                self.sign_in_error = None;
            }
            Some(Route::SignUp) | None => {}
        }
    }

    /// Follow an in-group link (sign-in <-> sign-up)
    pub fn navigate(&mut self, route: Route) {
        if self.nav.navigate(route, &self.auth) {
            self.sign_in_error = None;
        }
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Validate the form and start a sign-in on a background task.
    pub fn submit_sign_in(&mut self) {
        if self.is_submitting {
            return;
        }

        let form = SignInForm::new(self.email.clone(), self.password.clone());
        if let Err(e) = form.validate() {
            self.sign_in_error = Some(e.message().to_string());
            return;
        }

        self.sign_in_error = None;
        self.is_submitting = true;

        let store = self.store.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = store
                .sign_in(&form.email, &form.password)
                .await
                .map_err(|e| e.to_string());
            Self::send_result(&tx, ActionResult::SignIn(result)).await;
        });
    }

    /// Start a sign-out on a background task.
    pub fn submit_sign_out(&mut self) {
        if self.is_signing_out {
            return;
        }
        self.is_signing_out = true;
        self.status_message = Some("Signing out...".to_string());

        let store = self.store.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            store.sign_out().await;
            Self::send_result(&tx, ActionResult::SignOut).await;
        });
    }

    async fn send_result(tx: &mpsc::Sender<ActionResult>, result: ActionResult) {
        if tx.send(result).await.is_err() {
            warn!("Action result dropped, UI is gone");
        }
    }

    /// Drain finished background actions, then sync with the store.
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.action_rx.try_recv() {
            self.process_action_result(result);
        }
        self.sync_auth();
    }

    fn process_action_result(&mut self, result: ActionResult) {
        match result {
            ActionResult::SignIn(Ok(())) => {
                self.is_submitting = false;
                self.remember_email();
            }
            ActionResult::SignIn(Err(e)) => {
                self.is_submitting = false;
                debug!(error = %e, "Sign-in rejected");
                self.sign_in_error = Some(INVALID_CREDENTIALS_MESSAGE.to_string());
            }
            ActionResult::SignOut => {
                self.is_signing_out = false;
                self.status_message = None;
                info!("Signed out from UI");
            }
        }
    }

    fn remember_email(&mut self) {
        if self.config.last_email.as_deref() == Some(self.email.as_str()) {
            return;
        }
        self.config.last_email = Some(self.email.clone());
        if self.config.read_only {
            debug!("Config failed to load, not saving last email");
            return;
        }
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }
    }

    // =========================================================================
    // Form editing
    // =========================================================================

    pub fn push_char(&mut self, c: char) {
        match self.focus {
            SignInFocus::Email => {
                if can_add_email_char(self.email.chars().count(), c) {
                    self.email.push(c);
                }
            }
            SignInFocus::Password => {
                if can_add_password_char(self.password.chars().count(), c) {
                    self.password.push(c);
                }
            }
            SignInFocus::Button | SignInFocus::SignUpLink => {}
        }
    }

    pub fn pop_char(&mut self) {
        match self.focus {
            SignInFocus::Email => {
                self.email.pop();
            }
            SignInFocus::Password => {
                self.password.pop();
            }
            SignInFocus::Button | SignInFocus::SignUpLink => {}
        }
    }

    /// Wait for the next background action and apply it.
    #[cfg(test)]
    pub async fn settle(&mut self) {
        if let Some(result) = self.action_rx.recv().await {
            self.process_action_result(result);
        }
        self.sync_auth();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use authgate_core::api::MockCredentialService;
    use authgate_core::storage::MemoryKvStore;
    use authgate_core::USER_KEY;

    pub(crate) fn test_app(service: MockCredentialService, seed: Option<&str>) -> App {
        let storage = match seed {
            Some(json) => MemoryKvStore::with_entries([(USER_KEY, json)]),
            None => MemoryKvStore::new(),
        };
        let store = Arc::new(SessionStore::new(Arc::new(storage), Arc::new(service)));
        // Read-only so tests never touch the real config file
        let config = Config {
            last_email: Some("a@b.com".to_string()),
            read_only: true,
            ..Config::default()
        };
        App::new(config, store)
    }

    #[test]
    fn test_focus_cycle() {
        assert_eq!(SignInFocus::Email.next(), SignInFocus::Password);
        assert_eq!(SignInFocus::SignUpLink.next(), SignInFocus::Email);
        assert_eq!(SignInFocus::Email.prev(), SignInFocus::SignUpLink);
        assert_eq!(SignInFocus::Button.prev(), SignInFocus::Password);
    }

    #[test]
    fn test_splash_until_started() {
        let mut app = test_app(MockCredentialService::instant(), None);
        assert!(app.splash.is_visible());
        assert_eq!(app.current_route(), None);

        app.start();
        assert!(!app.splash.is_visible());
        assert_eq!(app.current_route(), Some(Route::SignIn));
    }

    #[test]
    fn test_start_with_persisted_session_goes_home() {
        let mut app = test_app(
            MockCredentialService::instant(),
            Some(r#"{"id":"1","email":"a@b.com"}"#),
        );
        app.start();
        assert_eq!(app.current_route(), Some(Route::Home));
    }

    #[test]
    fn test_empty_fields_rejected_before_store() {
        let service = Arc::new(MockCredentialService::instant());
        let store = Arc::new(SessionStore::new(Arc::new(MemoryKvStore::new()), service.clone()));
        let config = Config {
            read_only: true,
            ..Config::default()
        };
        let mut app = App::new(config, store);
        app.start();

        app.submit_sign_in();
        assert_eq!(app.sign_in_error.as_deref(), Some("Please fill in all fields"));
        assert!(!app.is_submitting);
        assert_eq!(service.sign_in_calls(), 0);
    }

    #[tokio::test]
    async fn test_sign_in_redirects_through_guard() {
        let mut app = test_app(MockCredentialService::instant(), None);
        app.start();
        app.password = "pw".to_string();

        app.submit_sign_in();
        assert!(app.is_submitting);
        app.settle().await;

        assert!(!app.is_submitting);
        assert_eq!(app.current_route(), Some(Route::Home));
        assert!(app.password.is_empty());
        assert_eq!(app.auth.session.as_ref().map(|u| u.email.as_str()), Some("a@b.com"));
    }

    #[tokio::test]
    async fn test_sign_in_remembers_email_without_saving_fallback_config() {
        let mut app = test_app(MockCredentialService::instant(), None);
        app.start();
        app.email = "new@b.com".to_string();
        app.password = "pw".to_string();

        app.submit_sign_in();
        app.settle().await;

        assert_eq!(app.current_route(), Some(Route::Home));
        assert_eq!(app.config.last_email.as_deref(), Some("new@b.com"));
        assert!(app.config.read_only);
    }

    #[tokio::test]
    async fn test_rejected_sign_in_shows_generic_message() {
        let mut app = test_app(MockCredentialService::instant().rejecting_sign_in(), None);
        app.start();
        app.password = "wrong".to_string();

        app.submit_sign_in();
        app.settle().await;

        assert_eq!(app.sign_in_error.as_deref(), Some("Invalid credentials"));
        assert_eq!(app.current_route(), Some(Route::SignIn));
        assert!(!app.is_submitting);
    }

    #[tokio::test]
    async fn test_sign_out_returns_to_sign_in() {
        let mut app = test_app(
            MockCredentialService::instant().failing_sign_out(),
            Some(r#"{"id":"1","email":"a@b.com"}"#),
        );
        app.start();
        assert_eq!(app.current_route(), Some(Route::Home));

        app.submit_sign_out();
        app.settle().await;

        assert_eq!(app.current_route(), Some(Route::SignIn));
        assert!(app.auth.session.is_none());
        assert!(!app.is_signing_out);
        assert_eq!(app.focus, SignInFocus::Password);
    }

    #[test]
    fn test_sign_up_link_stays_in_auth_group() {
        let mut app = test_app(MockCredentialService::instant(), None);
        app.start();
        app.navigate(Route::SignUp);
        assert_eq!(app.current_route(), Some(Route::SignUp));
        app.navigate(Route::Home);
        assert_eq!(app.current_route(), Some(Route::SignUp));
        app.navigate(Route::SignIn);
        assert_eq!(app.current_route(), Some(Route::SignIn));
    }

    #[test]
    fn test_form_editing_filters_input() {
        let mut app = test_app(MockCredentialService::instant(), None);
        app.email.clear();
        app.focus = SignInFocus::Email;
        app.push_char('x');
        app.push_char('\n');
        assert_eq!(app.email, "x");
        app.pop_char();
        assert!(app.email.is_empty());

        app.focus = SignInFocus::Button;
        app.push_char('y');
        assert!(app.email.is_empty());
        assert!(app.password.is_empty());
    }
}
