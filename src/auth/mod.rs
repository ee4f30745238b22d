//! Session endpoints outside the proxy path.
//!
//! # Data Flow
//! ```text
//! Login page → authorize.rs → 303 to <upstream>/oauth2/authorization/<provider>
//!     → provider → upstream → 302 to <callback>?token=… | ?error=…
//!     → callback.rs (Session Cookie, SameSite=None) → landing page
//!
//! Logout → logout.rs (Session Cookie cleared)
//! ```

pub mod authorize;
pub mod callback;
pub mod logout;

pub use authorize::oauth_authorize;
pub use callback::{oauth_callback, CallbackParams};
pub use logout::logout;
