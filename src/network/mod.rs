//! A network abstraction layer for embedded systems
//!
//! The traits here are the seam between the HTTP client and whatever TCP stack
//! the target provides. A platform implements [`SocketProvider`] and [`Tcp`];
//! everything above that is platform independent.
//!

#![allow(missing_docs)]
#![deny(unsafe_code)]

use core::net::SocketAddrV4;

/// Common error types for network operations
pub mod error;

/// Application layer protocols built on top of the traits in this module
pub mod application;

/// Connection establishment against an [`Endpoint`](crate::config::Endpoint)
pub mod socket;

/// `std::net` implementation of the socket traits
#[cfg(feature = "std")]
pub mod std_net;

pub use error::Error;

/// Re-exports of common traits
pub mod prelude {
    pub use super::{Close, Connection, Read, SocketProvider, Tcp, Write};
}

/// Read bytes from a connection.
pub trait Read {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Read data from the connection
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Write bytes to a connection.
pub trait Write {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Write data to the connection
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Flush the write buffer
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Release a connection. Consumes it, so a closed connection cannot be used.
pub trait Close {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Close the connection
    fn close(self) -> Result<(), Self::Error>;
}

/// A synchronous connection
pub trait Connection: Read + Write + Close {}

/// A TCP stream socket.
///
/// Reads block until data arrives, the peer closes (`Ok(0)`), or the read
/// timeout elapses, in which case the read fails with [`Error::Timeout`].
pub trait Tcp:
    Connection + Read<Error = Error> + Write<Error = Error> + Close<Error = Error>
{
    /// Bound the next reads to `timeout_ms` milliseconds. `None` blocks forever.
    fn set_read_timeout(&mut self, timeout_ms: Option<u32>) -> Result<(), Error>;
}

/// Creates and connects TCP sockets.
///
/// Errors are the platform's own error codes (errno values on most stacks).
pub trait SocketProvider {
    /// The socket type handed out by this provider
    type Socket: Tcp;

    /// Create an unconnected IPv4 stream socket.
    fn open(&mut self) -> Result<Self::Socket, i32>;

    /// Connect `socket` to `remote`.
    fn connect(&mut self, socket: &mut Self::Socket, remote: SocketAddrV4) -> Result<(), i32>;
}
