use tracing::debug;

use crate::auth::AuthState;

/// Mutually exclusive route subtrees
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteGroup {
    /// Reachable only while logged out
    Auth,
    /// Reachable only while logged in
    Tabs,
}

impl RouteGroup {
    /// Route shown when the group becomes active
    pub fn entry(&self) -> Route {
        match self {
            RouteGroup::Auth => Route::SignIn,
            RouteGroup::Tabs => Route::Home,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    SignIn,
    SignUp,
    Home,
}

impl Route {
    pub fn group(&self) -> RouteGroup {
        match self {
            Route::SignIn | Route::SignUp => RouteGroup::Auth,
            Route::Home => RouteGroup::Tabs,
        }
    }

    pub fn is_accessible(&self, state: &AuthState) -> bool {
        guard(state) == Some(self.group())
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::SignIn => "Sign In",
            Route::SignUp => "Sign Up",
            Route::Home => "Home",
        }
    }
}

/// The active route group, or `None` while the session is still loading.
pub fn guard(state: &AuthState) -> Option<RouteGroup> {
    if state.is_loading {
        None
    } else if state.session.is_some() {
        Some(RouteGroup::Tabs)
    } else {
        Some(RouteGroup::Auth)
    }
}

/// Tracks the current route and keeps it inside the guarded group.
#[derive(Debug, Clone)]
pub struct NavigationGuard {
    current: Option<Route>,
}

impl Default for NavigationGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationGuard {
    pub fn new() -> Self {
        Self { current: None }
    }

    /// Current route, `None` until the first non-loading state is seen
    pub fn current(&self) -> Option<Route> {
        self.current
    }

    /// React to a state change. Returns true when the route changed.
    pub fn sync(&mut self, state: &AuthState) -> bool {
        let Some(group) = guard(state) else {
            return false;
        };

        match self.current {
            Some(route) if route.group() == group => false,
            previous => {
                let next = group.entry();
                debug!(?previous, ?next, "Guard redirect");
                self.current = Some(next);
                true
            }
        }
    }

    /// Follow a link. Refused when the target is guarded off.
    pub fn navigate(&mut self, route: Route, state: &AuthState) -> bool {
        if !route.is_accessible(state) {
            debug!(?route, "Navigation refused by guard");
            return false;
        }
        self.current = Some(route);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;

    fn loading() -> AuthState {
        AuthState::initial()
    }

    fn logged_out() -> AuthState {
        AuthState {
            session: None,
            is_loading: false,
        }
    }

    fn logged_in() -> AuthState {
        AuthState {
            session: Some(User::new("1", "a@b.com")),
            is_loading: false,
        }
    }

    #[test]
    fn test_guard_groups() {
        assert_eq!(guard(&loading()), None);
        assert_eq!(guard(&logged_out()), Some(RouteGroup::Auth));
        assert_eq!(guard(&logged_in()), Some(RouteGroup::Tabs));
    }

    #[test]
    fn test_route_accessibility_is_exclusive() {
        for route in [Route::SignIn, Route::SignUp, Route::Home] {
            assert!(!route.is_accessible(&loading()));
            assert_ne!(route.is_accessible(&logged_out()), route.is_accessible(&logged_in()));
        }
    }

    #[test]
    fn test_sync_waits_for_loading() {
        let mut nav = NavigationGuard::new();
        assert!(!nav.sync(&loading()));
        assert_eq!(nav.current(), None);

        assert!(nav.sync(&logged_out()));
        assert_eq!(nav.current(), Some(Route::SignIn));
    }

    #[test]
    fn test_sync_redirects_on_session_change() {
        let mut nav = NavigationGuard::new();
        nav.sync(&logged_out());

        assert!(nav.sync(&logged_in()));
        assert_eq!(nav.current(), Some(Route::Home));

        assert!(nav.sync(&logged_out()));
        assert_eq!(nav.current(), Some(Route::SignIn));
    }

    #[test]
    fn test_sync_keeps_route_within_group() {
        let mut nav = NavigationGuard::new();
        nav.sync(&logged_out());
        assert!(nav.navigate(Route::SignUp, &logged_out()));

        // Same group, no redirect
        assert!(!nav.sync(&logged_out()));
        assert_eq!(nav.current(), Some(Route::SignUp));

        // Sign-in from the sign-up screen lands on home
        assert!(nav.sync(&logged_in()));
        assert_eq!(nav.current(), Some(Route::Home));
    }

    #[test]
    fn test_navigate_refuses_guarded_routes() {
        let mut nav = NavigationGuard::new();
        nav.sync(&logged_out());
        assert!(!nav.navigate(Route::Home, &logged_out()));
        assert_eq!(nav.current(), Some(Route::SignIn));

        nav.sync(&logged_in());
        assert!(!nav.navigate(Route::SignIn, &logged_in()));
        assert_eq!(nav.current(), Some(Route::Home));
    }
}
