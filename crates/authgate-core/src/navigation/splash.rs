use tokio::sync::watch;
use tracing::debug;

use crate::auth::AuthState;

/// Keeps the startup splash up until the session store stops loading.
#[derive(Debug, Clone)]
pub struct SplashController {
    visible: bool,
}

impl Default for SplashController {
    fn default() -> Self {
        Self::new()
    }
}

impl SplashController {
    /// Starts visible
    pub fn new() -> Self {
        Self { visible: true }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Returns true exactly once: on the first state that is not loading.
    pub fn observe(&mut self, state: &AuthState) -> bool {
        if self.visible && !state.is_loading {
            self.visible = false;
            debug!("Hiding splash screen");
            return true;
        }
        false
    }
}

/// Resolve once the observed state is no longer loading.
///
/// Returns the state that ended the wait, or `None` if the store was dropped
/// first.
pub async fn wait_until_ready(rx: &mut watch::Receiver<AuthState>) -> Option<AuthState> {
    rx.wait_for(|state| !state.is_loading)
        .await
        .ok()
        .map(|state| state.clone())
}
