//! Session gateway library.
//!
//! Relays `/api/*` calls to an upstream API, translating an HttpOnly
//! session cookie into `Authorization: Bearer` and upstream session
//! signals back into cookie writes.

pub mod auth;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod routing;
pub mod session;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
