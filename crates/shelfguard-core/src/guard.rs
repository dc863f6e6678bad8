//! Navigation guard for protected views.
//!
//! The policy is a pure predicate over a [`SessionState`]; the redirect is a
//! side effect the guard performs through a [`Navigator`] only when the
//! predicate says [`GuardDecision::Blocked`].

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::session::SessionState;
use crate::store::SessionStore;
use crate::traits::Navigator;
use crate::types::Route;

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Navigation proceeds.
    Open,
    /// Navigation is redirected to the login entry point.
    Blocked,
}

/// Decide whether a protected view may render for `state` at `now`.
pub fn decide(state: &SessionState, now: DateTime<Utc>) -> GuardDecision {
    if state.is_authenticated_at(now) {
        GuardDecision::Open
    } else {
        GuardDecision::Blocked
    }
}

/// The set of route patterns that require a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedRoutes {
    patterns: Vec<Route>,
}

impl ProtectedRoutes {
    pub fn new(patterns: impl IntoIterator<Item = Route>) -> Self {
        Self {
            patterns: patterns.into_iter().collect(),
        }
    }

    /// The book-network views: the book list and everything a member manages.
    pub fn book_network() -> Self {
        Self::new(
            [
                "/",
                "/my-books",
                "/manage",
                "/manage/:bookId",
                "/my-borrowed-books",
                "/my-returned-books",
            ]
            .into_iter()
            .map(Route::from_static),
        )
    }

    pub fn is_protected(&self, route: &Route) -> bool {
        self.patterns.iter().any(|pattern| route.matches(pattern))
    }

    pub fn patterns(&self) -> &[Route] {
        &self.patterns
    }
}

/// Guards navigation to protected views.
///
/// The guard keeps no decision between attempts: every call reads the
/// store afresh, so a logout, an expiry or a rejection-triggered clear is
/// honoured by the very next navigation.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    store: SessionStore,
    routes: ProtectedRoutes,
    login: Route,
}

impl RouteGuard {
    /// Route of the login entry point.
    pub const LOGIN_ROUTE: &'static str = "/login";

    /// Guard the book-network views, redirecting to `/login`.
    pub fn new(store: SessionStore) -> Self {
        Self {
            store,
            routes: ProtectedRoutes::book_network(),
            login: Route::from_static(Self::LOGIN_ROUTE),
        }
    }

    pub fn with_routes(mut self, routes: ProtectedRoutes) -> Self {
        self.routes = routes;
        self
    }

    pub fn with_login_route(mut self, login: Route) -> Self {
        self.login = login;
        self
    }

    pub fn login_route(&self) -> &Route {
        &self.login
    }

    pub fn routes(&self) -> &ProtectedRoutes {
        &self.routes
    }

    /// Evaluate a navigation attempt without redirecting.
    pub fn evaluate(&self, route: &Route) -> GuardDecision {
        self.evaluate_at(route, Utc::now())
    }

    /// Evaluate a navigation attempt at `now` without redirecting.
    ///
    /// Routes outside the protected set are always open.
    pub fn evaluate_at(&self, route: &Route, now: DateTime<Utc>) -> GuardDecision {
        if !self.routes.is_protected(route) {
            return GuardDecision::Open;
        }
        decide(&self.store.snapshot(), now)
    }

    /// Evaluate a navigation attempt and redirect to login when blocked.
    pub fn check(&self, route: &Route, navigator: &dyn Navigator) -> GuardDecision {
        let decision = self.evaluate(route);
        debug!(%route, ?decision, "Route guard evaluated");
        if decision == GuardDecision::Blocked {
            navigator.navigate(&self.login);
        }
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Credential;
    use chrono::Duration;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingNavigator {
        visited: RefCell<Vec<Route>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, target: &Route) {
            self.visited.borrow_mut().push(target.clone());
        }
    }

    fn route(path: &str) -> Route {
        Route::new(path).unwrap()
    }

    #[test]
    fn predicate_matches_session_state() {
        let now = Utc::now();
        assert_eq!(decide(&SessionState::anonymous(), now), GuardDecision::Blocked);

        let live = Credential::new("abc").unwrap().with_expiry(Some(now + Duration::hours(1)));
        assert_eq!(decide(&SessionState::new(Some(live)), now), GuardDecision::Open);

        let boundary = Credential::new("abc").unwrap().with_expiry(Some(now));
        assert_eq!(decide(&SessionState::new(Some(boundary)), now), GuardDecision::Blocked);
    }

    #[test]
    fn blocks_every_protected_route_without_session() {
        let guard = RouteGuard::new(SessionStore::in_memory());
        let navigator = RecordingNavigator::default();
        for path in ["/", "/my-books", "/manage", "/manage/12", "/my-borrowed-books", "/my-returned-books"] {
            assert_eq!(guard.check(&route(path), &navigator), GuardDecision::Blocked);
        }
        let visited = navigator.visited.borrow();
        assert_eq!(visited.len(), 6);
        assert!(visited.iter().all(|r| r.as_str() == "/login"));
    }

    #[test]
    fn opens_protected_routes_with_live_session() {
        let store = SessionStore::in_memory();
        store
            .set(Credential::new("abc123").unwrap().with_expiry(Some(Utc::now() + Duration::hours(1))))
            .unwrap();
        let guard = RouteGuard::new(store);
        let navigator = RecordingNavigator::default();

        assert_eq!(guard.check(&route("/my-books"), &navigator), GuardDecision::Open);
        assert!(navigator.visited.borrow().is_empty());
    }

    #[test]
    fn public_routes_are_always_open() {
        let guard = RouteGuard::new(SessionStore::in_memory());
        for path in ["/login", "/register", "/activate-account"] {
            assert_eq!(guard.evaluate(&route(path)), GuardDecision::Open);
        }
    }

    #[test]
    fn decision_is_not_cached_between_attempts() {
        let store = SessionStore::in_memory();
        store.set(Credential::new("abc123").unwrap()).unwrap();
        let guard = RouteGuard::new(store.clone());
        let target = route("/my-borrowed-books");

        assert_eq!(guard.evaluate(&target), GuardDecision::Open);
        store.clear().unwrap();
        assert_eq!(guard.evaluate(&target), GuardDecision::Blocked);
    }

    #[test]
    fn expired_session_is_blocked() {
        let store = SessionStore::in_memory();
        let now = Utc::now();
        store
            .set(Credential::new("abc123").unwrap().with_expiry(Some(now + Duration::minutes(15))))
            .unwrap();
        let guard = RouteGuard::new(store);
        let target = route("/manage/7");

        assert_eq!(guard.evaluate_at(&target, now), GuardDecision::Open);
        assert_eq!(
            guard.evaluate_at(&target, now + Duration::minutes(15)),
            GuardDecision::Blocked
        );
    }

    #[test]
    fn custom_login_route_is_used_for_redirect() {
        let guard = RouteGuard::new(SessionStore::in_memory()).with_login_route(route("/sign-in"));
        let navigator = RecordingNavigator::default();
        guard.check(&route("/my-books"), &navigator);
        assert_eq!(navigator.visited.borrow()[0].as_str(), "/sign-in");
    }
}
