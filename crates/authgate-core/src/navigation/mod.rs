//! Reactions to session state.
//!
//! Front-ends never navigate on sign-in or sign-out themselves. They feed
//! every observed `AuthState` to:
//! - `NavigationGuard`: picks the visible route group and redirects when the
//!   current route is guarded off
//! - `SplashController`: hides the startup splash once loading finishes

pub mod guard;
pub mod splash;

pub use guard::{guard, NavigationGuard, Route, RouteGroup};
pub use splash::{wait_until_ready, SplashController};
