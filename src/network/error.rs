//! Common error types for network operations

use core::fmt;

const EINVAL: i32 = 22;
const EIO: i32 = 5;
const ENOTCONN: i32 = 107;
const ECONNRESET: i32 = 104;
const ETIMEDOUT: i32 = 110;
const EBADMSG: i32 = 74;
const ENOBUFS: i32 = 105;
const ECANCELED: i32 = 125;
const ESHUTDOWN: i32 = 108;

/// A common error type for network operations.
///
/// Every variant maps to a negative errno-style code through [`Error::code`],
/// so the result of a request can be reported the same way a platform socket
/// API would report it. Variants that wrap a platform code carry it verbatim.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The server address is not a valid IPv4 literal.
    InvalidAddress,
    /// The platform refused to create a stream socket.
    SocketCreate(i32),
    /// The TCP connect failed.
    Connect(i32),
    /// An operation was attempted on a connection that is not open.
    NotOpen,
    /// The request did not complete before its deadline.
    Timeout,
    /// An error occurred during a write operation.
    WriteError,
    /// An error occurred during a read operation.
    ReadError,
    /// The peer closed the connection before the response was complete.
    ConnectionClosed,
    /// The response could not be parsed as HTTP/1.1.
    ProtocolError,
    /// The request head or the response head does not fit in its buffer.
    BufferOverflow,
    /// The response observer asked the client to stop reading.
    Aborted,
    /// The request loop has already stopped.
    Stopped,
}

impl Error {
    /// Returns the negative errno-style code for this error.
    pub fn code(&self) -> i32 {
        match self {
            Error::InvalidAddress => -EINVAL,
            Error::SocketCreate(code) | Error::Connect(code) => negative(*code),
            Error::NotOpen => -ENOTCONN,
            Error::Timeout => -ETIMEDOUT,
            Error::WriteError | Error::ReadError => -EIO,
            Error::ConnectionClosed => -ECONNRESET,
            Error::ProtocolError => -EBADMSG,
            Error::BufferOverflow => -ENOBUFS,
            Error::Aborted => -ECANCELED,
            Error::Stopped => -ESHUTDOWN,
        }
    }

    /// `true` for failures of the request transport itself (reset, read or
    /// write failures), as opposed to timeouts and setup errors.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            Error::WriteError | Error::ReadError | Error::ConnectionClosed
        )
    }
}

fn negative(code: i32) -> i32 {
    match code {
        0 => -EIO,
        c if c > 0 => -c,
        c => c,
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Error::InvalidAddress => "invalid server address",
            Error::SocketCreate(_) => "socket create failed",
            Error::Connect(_) => "connect failed",
            Error::NotOpen => "connection not open",
            Error::Timeout => "request timed out",
            Error::WriteError => "write error",
            Error::ReadError => "read error",
            Error::ConnectionClosed => "connection closed by peer",
            Error::ProtocolError => "malformed HTTP response",
            Error::BufferOverflow => "buffer overflow",
            Error::Aborted => "aborted by response observer",
            Error::Stopped => "request loop stopped",
        };
        write!(f, "{} ({})", text, self.code())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::InvalidAddress => defmt::write!(f, "InvalidAddress"),
            Error::SocketCreate(code) => defmt::write!(f, "SocketCreate({})", code),
            Error::Connect(code) => defmt::write!(f, "Connect({})", code),
            Error::NotOpen => defmt::write!(f, "NotOpen"),
            Error::Timeout => defmt::write!(f, "Timeout"),
            Error::WriteError => defmt::write!(f, "WriteError"),
            Error::ReadError => defmt::write!(f, "ReadError"),
            Error::ConnectionClosed => defmt::write!(f, "ConnectionClosed"),
            Error::ProtocolError => defmt::write!(f, "ProtocolError"),
            Error::BufferOverflow => defmt::write!(f, "BufferOverflow"),
            Error::Aborted => defmt::write!(f, "Aborted"),
            Error::Stopped => defmt::write!(f, "Stopped"),
        }
    }
}
