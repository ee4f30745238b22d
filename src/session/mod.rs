//! Session subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request cookie jar
//!     → cookie.rs (read bearer token; empty = no session)
//!
//! Upstream response Set-Cookie headers
//!     → signal.rs (parse, find the session cookie)
//!     → SessionSignal::Establish / Clear
//!     → cookie.rs (build the caller-facing cookie)
//! ```
//!
//! # Design Decisions
//! - Session state lives only in the cookie; nothing is kept in memory
//! - Upstream cookie attributes are never forwarded, only its value

pub mod cookie;
pub mod signal;

pub use cookie::SessionCookies;
pub use signal::{session_signal, SessionSignal};
