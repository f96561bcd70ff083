//! # Application Layer Network Protocols
//!
//! Application layer (OSI Layer 7) protocols built on the core network traits.
//! Each protocol works with any type implementing
//! [`Tcp`](crate::network::Tcp), uses fixed-size buffers, and reports failures
//! through [`Error`](crate::network::error::Error).
//!
//! ## Available Protocols
//!
//! - **[`http`]**: HTTP/1.1 client streaming responses to an observer

/// HTTP client implementation.
///
/// Provides a simple HTTP/1.1 client suitable for embedded systems,
/// supporting GET, PUT and POST with an optional payload.
pub mod http;
