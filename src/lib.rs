//! MusicAI Playlist Agent Library
//!
//! This library wires a hosted chat model to a handful of Spotify Web API
//! operations so a user can ask for a playlist in plain language. It includes
//! modules for the domain tools, the tool-calling agent, conversation memory,
//! configuration and the two interface shells (terminal and WebSocket).
//!
//! # Modules
//!
//! - `agent` - Tool-calling agent loop and the hosted chat model client
//! - `api` - HTTP/WebSocket endpoints served by the local server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Typed errors for tools, agent and configuration
//! - `management` - Token persistence and conversation sessions
//! - `recommendations` - Track recommendation client
//! - `server` - Axum routers for the OAuth callback and the chat endpoint
//! - `spotify` - Spotify Web API client implementation
//! - `tools` - The four callable tools exposed to the agent
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use musicai::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> musicai::Res<()> {
//!     config::load_env().await?;
//!     cli::chat().await;
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod recommendations;
pub mod server;
pub mod spotify;
pub mod tools;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used at the process level (startup, server binding) where the caller only
/// needs to report the failure. Domain code returns the typed errors from
/// [`error`] instead.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Spotify user ID: {}", user_id);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Authentication successful!");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only for unrecoverable startup failures: missing credentials, a server
/// address that cannot be bound, a token that cannot be loaded.
///
/// # Example
///
/// ```
/// error!("GROQ_API_KEY must be set");
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("No .env file found, using process environment");
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
