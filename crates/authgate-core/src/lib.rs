//! Core library for authgate.
//!
//! Holds everything the front-ends share:
//! - `models`: the `User` session record
//! - `storage`: synchronous key-value persistence
//! - `api`: credential services (mock and HTTP)
//! - `auth`: the `SessionStore` state container
//! - `navigation`: route guard and splash-screen controller
//! - `forms`: sign-in form validation
//! - `config`: on-disk configuration

pub mod api;
pub mod auth;
pub mod config;
pub mod forms;
pub mod models;
pub mod navigation;
pub mod storage;

pub use api::{AuthError, CredentialService, SignInResponse};
pub use auth::{AuthPhase, AuthState, SessionStore, USER_KEY};
pub use config::Config;
pub use models::User;
pub use storage::{FileKvStore, KeyValueStore, MemoryKvStore, StorageError};
