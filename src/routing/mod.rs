//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → router.rs (classify: protected / guest-only / public)
//!     → matcher.rs (evaluate prefix conditions)
//!     → Return: RouteClass, then GuardDecision with the session state
//!
//! Route Compilation (at startup):
//!     RoutesConfig
//!     → Compile prefix matchers
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always yields the same class

pub mod matcher;
pub mod router;

pub use router::{GuardDecision, RouteClass, RouteTable, SessionState};
