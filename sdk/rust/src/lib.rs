//! Typed client for the session gateway's proxied API.
//!
//! ```no_run
//! # async fn run() -> Result<(), gateway_sdk::ClientError> {
//! let client = gateway_sdk::GatewayClient::new("http://localhost:3000")?;
//! let me: serde_json::Value = client.get("v1/users/me").await?;
//! # Ok(()) }
//! ```

pub mod client;
pub mod error;

pub use client::GatewayClient;
pub use error::{ClientError, Payload};
