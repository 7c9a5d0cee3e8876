// Core functionality shared by both guidance flows:
// - Request/response envelopes for the chat-gita endpoint
// - HTTP transport
// - Configuration loading
// - Shared error types

// Export client module - transport for the chat-gita endpoint
pub mod client;
pub use client::*;

// Export types module - Request/response data structures
pub mod types;
pub use types::*;

// Export config module - Configuration loading
pub mod config;
pub use config::*;

// Export errors module - Shared error types
pub mod errors;
pub use errors::*;
