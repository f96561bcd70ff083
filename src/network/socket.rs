use crate::config::Endpoint;
use crate::network::error::Error;
use crate::network::{Close, SocketProvider};
use core::net::{Ipv4Addr, SocketAddrV4};
use log::debug;

/// Open a TCP connection to `endpoint`.
///
/// On failure nothing stays allocated: a socket that was created but could not
/// connect is closed before the error is returned. Failures are only traced at
/// debug level; reporting them is up to the caller.
pub fn connect<P: SocketProvider>(provider: &mut P, endpoint: &Endpoint) -> Result<P::Socket, Error> {
    let remote = resolve(endpoint)?;

    let mut socket = provider.open().map_err(|code| {
        let err = Error::SocketCreate(code);
        debug!("Socket create failed ({})", err.code());
        err
    })?;

    if let Err(code) = provider.connect(&mut socket, remote) {
        let err = Error::Connect(code);
        debug!("Connect failed ({})", err.code());
        // The connect error is what the caller needs to see.
        let _ = socket.close();
        return Err(err);
    }

    debug!("Connected to {}", remote);
    Ok(socket)
}

/// Parse the endpoint's IPv4 literal into a socket address.
pub fn resolve(endpoint: &Endpoint) -> Result<SocketAddrV4, Error> {
    let ip: Ipv4Addr = endpoint.address.parse().map_err(|_| {
        debug!("Invalid server address");
        Error::InvalidAddress
    })?;
    Ok(SocketAddrV4::new(ip, endpoint.port))
}
