//! HTTP client functionality for apiprobe
//!
//! This crate provides the authenticated API client used by every test,
//! the `HttpResponse` capability trait its responses implement, and
//! WebSocket echo helpers behind the `websocket` feature.

pub mod client;
pub mod errors;
pub mod response;
pub mod types;

#[cfg(feature = "websocket")]
pub mod websocket;

// Re-export main types for convenience
pub use client::ApiClient;
pub use errors::HttpError;
pub use response::{ApiResponse, HttpResponse};
pub use types::{Headers, HttpMethod};

#[cfg(feature = "websocket")]
pub use websocket::{EchoSocket, WebSocketError};
