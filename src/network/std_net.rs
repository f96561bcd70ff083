//! [`SocketProvider`] backed by `std::net::TcpStream`.

use crate::network::error::Error;
use crate::network::{Close, Connection, Read, SocketProvider, Tcp, Write};
use core::net::SocketAddrV4;
use std::io::{self, Read as StdRead, Write as StdWrite};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::Duration;

const EIO: i32 = 5;

/// Hands out [`StdSocket`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdSocketProvider;

/// A TCP socket over `std::net`.
///
/// `std` has no unconnected stream sockets, so the stream only exists once
/// [`SocketProvider::connect`] succeeds.
#[derive(Debug)]
pub struct StdSocket {
    stream: Option<TcpStream>,
}

impl StdSocket {
    fn stream(&mut self) -> Result<&mut TcpStream, Error> {
        self.stream.as_mut().ok_or(Error::NotOpen)
    }
}

fn os_code(err: &io::Error) -> i32 {
    err.raw_os_error().unwrap_or(EIO)
}

impl SocketProvider for StdSocketProvider {
    type Socket = StdSocket;

    fn open(&mut self) -> Result<Self::Socket, i32> {
        Ok(StdSocket { stream: None })
    }

    fn connect(&mut self, socket: &mut Self::Socket, remote: SocketAddrV4) -> Result<(), i32> {
        let stream = TcpStream::connect(SocketAddr::V4(remote)).map_err(|e| os_code(&e))?;
        stream.set_nodelay(true).map_err(|e| os_code(&e))?;
        socket.stream = Some(stream);
        Ok(())
    }
}

impl Read for StdSocket {
    type Error = Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.stream()?.read(buf).map_err(|e| match e.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => Error::Timeout,
            io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted => {
                Error::ConnectionClosed
            }
            _ => Error::ReadError,
        })
    }
}

impl Write for StdSocket {
    type Error = Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.stream()?.write(buf).map_err(|_| Error::WriteError)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.stream()?.flush().map_err(|_| Error::WriteError)
    }
}

impl Close for StdSocket {
    type Error = Error;

    fn close(self) -> Result<(), Self::Error> {
        if let Some(stream) = self.stream {
            match stream.shutdown(Shutdown::Both) {
                Ok(()) => {}
                // The peer may already have torn the connection down.
                Err(e) if e.kind() == io::ErrorKind::NotConnected => {}
                Err(_) => return Err(Error::WriteError),
            }
        }
        Ok(())
    }
}

impl Connection for StdSocket {}

impl Tcp for StdSocket {
    fn set_read_timeout(&mut self, timeout_ms: Option<u32>) -> Result<(), Error> {
        // A zero duration is rejected by std; round up to the smallest timeout.
        let timeout = timeout_ms.map(|ms| Duration::from_millis(u64::from(ms.max(1))));
        self.stream()?
            .set_read_timeout(timeout)
            .map_err(|_| Error::ReadError)
    }
}
