//! # CLI Module
//!
//! User-facing commands of the `musicai` binary.
//!
//! ## Commands
//!
//! - [`auth`] - Authorizes the app with Spotify (OAuth 2.0 PKCE) and stores the token
//! - [`chat`] - Interactive terminal conversation with the playlist agent
//! - [`serve`] - WebSocket server exposing the same agent, one session per connection
//!
//! ## Usage Patterns
//!
//! ```bash
//! musicai auth        # once, opens the browser
//! musicai             # chat in the terminal
//! musicai serve       # or serve ws://$SERVER_ADDRESS/chat
//! ```
//!
//! Both shells build the agent the same way: stored Spotify token, ReccoBeats
//! recommendations and the Groq-hosted chat model. Startup failures (missing
//! token, missing API key) are fatal and reported with the `error!` macro.

mod auth;
mod chat;
mod serve;
mod setup;

pub use auth::auth;
pub use chat::{THREAD_ID, chat, run_chat};
pub use serve::serve;
