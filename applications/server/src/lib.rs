//! Mezgebe Server Library
//!
//! Same-origin audio proxy and read-only catalog API for the Mezgebe PWA.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use services::AudioGateway;
pub use state::AppState;
