//! # API Module
//!
//! HTTP and WebSocket endpoints served by the local servers.
//!
//! ## Endpoints
//!
//! ### Authentication (temporary callback server)
//!
//! - [`callback`] - Completes the Spotify OAuth 2.0 PKCE flow by exchanging the
//!   authorization code for an access token.
//! - [`health`] - Status and version.
//!
//! ### Chat server (`musicai serve`)
//!
//! - [`root`] - Service status and the WebSocket endpoint path.
//! - [`health`] - Status and version.
//! - [`chat`] - WebSocket endpoint; one agent session per connection.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use musicai::api::{chat, health, root};
//!
//! let app = Router::new()
//!     .route("/", get(root))
//!     .route("/health", get(health))
//!     .route("/chat", get(chat))
//!     .with_state(state);
//! ```

mod callback;
pub mod chat;
mod health;

pub use callback::callback;
pub use chat::chat;
pub use health::{health, root};
