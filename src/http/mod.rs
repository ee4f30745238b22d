//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layers)
//!     → request.rs (assign/propagate request ID)
//!     → middleware/route_guard.rs (allow or redirect by cookie presence)
//!     → proxy relay | OAuth/logout endpoints | UI pages
//!     → response.rs (generic error bodies, bodiless statuses)
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::{AppState, HttpServer, ServerError};
