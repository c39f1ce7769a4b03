//! Authentication state management.
//!
//! This module provides:
//! - `SessionStore`: the process-wide container for the signed-in user and
//!   the startup loading flag, persisted through a `KeyValueStore`
//! - `AuthState` / `AuthPhase`: the observable state and its state-machine view
//!
//! Observers subscribe to a `tokio::sync::watch` channel; nothing polls.

pub mod state;
pub mod store;

pub use state::{AuthPhase, AuthState};
pub use store::{SessionStore, USER_KEY};
