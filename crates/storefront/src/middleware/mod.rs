//! HTTP middleware and extractors for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP context)
//! 2. `TraceLayer` (request span with `request_id` and `user_id` fields)
//! 3. Request ID
//! 4. Session layer (tower-sessions with `SQLite` store)
//! 5. 404 re-render with the shopper's layout

pub mod auth;
pub mod flash;
pub mod page;
pub mod request_id;
pub mod session;

pub use auth::{AuthContext, AuthRejection, RequireAuth};
pub use flash::{push_flash, take_flashes};
pub use page::{PageContext, render_not_found};
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
