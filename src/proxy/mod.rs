//! Proxy relay subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound <prefix>/<tail> (GET/POST/PUT/DELETE/PATCH)
//!     → relay.rs (read cookie, read JSON body for POST/PUT/PATCH)
//!     → upstream.rs (one bounded call with Authorization: Bearer)
//!     → upstream.rs (status, content type, session signal, body unless 204/205/304)
//!     → relay.rs (cookie write on signal, emit response)
//!
//! On failure:
//!     error.rs → generic JSON error, no cookie write
//! ```
//!
//! # Design Decisions
//! - Exactly one upstream call per inbound request, no retries
//! - Upstream non-2xx is relayed unchanged; only transport failures are errors
//! - The upstream Set-Cookie header is consumed, never forwarded

pub mod error;
pub mod relay;
pub mod upstream;

pub use error::RelayError;
pub use relay::relay;
pub use upstream::{UpstreamClient, UpstreamRequest, UpstreamResponse};
