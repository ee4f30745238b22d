//! Route classification for the route guard.
//!
//! # Responsibilities
//! - Store compiled protected and guest-only prefixes
//! - Classify a request path
//! - Decide allow/redirect from (class, session state)
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Protected prefixes are checked before guest-only ones
//! - Decisions are pure; the middleware only performs them

use crate::config::RoutesConfig;
use crate::routing::matcher::{AnyMatcher, Matcher};

/// Class of a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Requires an active session.
    Protected,
    /// Sign-in and sign-up pages.
    GuestOnly,
    /// Everything else.
    Public,
}

/// Session state as seen by the guard: cookie presence only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
}

impl SessionState {
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some(t) if !t.is_empty() => SessionState::Authenticated,
            _ => SessionState::Unauthenticated,
        }
    }
}

/// Outcome of the guard for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectToSignIn,
    RedirectToLanding,
}

/// Compiled route classification.
#[derive(Debug)]
pub struct RouteTable {
    protected: AnyMatcher,
    guest_only: AnyMatcher,
    sign_in_path: String,
    landing_path: String,
}

impl RouteTable {
    pub fn from_config(config: &RoutesConfig) -> Self {
        Self {
            protected: AnyMatcher::prefixes(config.protected_prefixes.iter().cloned()),
            guest_only: AnyMatcher::prefixes(config.guest_only_prefixes.iter().cloned()),
            sign_in_path: config.sign_in_path.clone(),
            landing_path: config.landing_path.clone(),
        }
    }

    pub fn classify(&self, path: &str) -> RouteClass {
        if self.protected.matches(path) {
            RouteClass::Protected
        } else if self.guest_only.matches(path) {
            RouteClass::GuestOnly
        } else {
            RouteClass::Public
        }
    }

    pub fn decide(&self, path: &str, session: SessionState) -> GuardDecision {
        match (self.classify(path), session) {
            (RouteClass::Protected, SessionState::Unauthenticated) => GuardDecision::RedirectToSignIn,
            (RouteClass::GuestOnly, SessionState::Authenticated) => GuardDecision::RedirectToLanding,
            _ => GuardDecision::Allow,
        }
    }

    pub fn sign_in_path(&self) -> &str {
        &self.sign_in_path
    }

    pub fn landing_path(&self) -> &str {
        &self.landing_path
    }
}
