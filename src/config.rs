//! Request loop configuration.
//!
//! Everything is fixed by [`Config::DEFAULT`] unless a JSON document is
//! supplied through [`Config::from_json`]. Omitted fields fall back to the
//! defaults. Strings are borrowed from the input, so the document must outlive
//! the configuration.
//!
//! ```rust
//! use iotloop::config::Config;
//!
//! let config = Config::from_json(br#"{"endpoint":{"address":"10.0.0.7"},"cycle_delay_ms":1000}"#).unwrap();
//! assert_eq!(config.endpoint.address, "10.0.0.7");
//! assert_eq!(config.endpoint.port, 8888);
//! assert_eq!(config.cycle_delay_ms, 1000);
//! assert_eq!(config.timeout_ms, 3000);
//! ```

use serde::Deserialize;

/// Capacity of the receive buffer shared by every request.
pub const RECV_BUF_LEN: usize = 512;

/// The server resource the loop talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Endpoint<'a> {
    /// IPv4 literal, also sent as the `Host` header.
    pub address: &'a str,
    /// TCP port.
    pub port: u16,
    /// Request target for both GET and PUT.
    pub path: &'a str,
    /// Protocol string of the request line.
    pub protocol: &'a str,
}

impl Endpoint<'static> {
    /// `192.168.0.103:8888`, path `/11`, `HTTP/1.1`.
    pub const DEFAULT: Self = Self {
        address: "192.168.0.103",
        port: 8888,
        path: "/11",
        protocol: "HTTP/1.1",
    };
}

impl Default for Endpoint<'_> {
    fn default() -> Self {
        Endpoint::DEFAULT
    }
}

/// Loop configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config<'a> {
    /// Target server.
    #[serde(borrow)]
    pub endpoint: Endpoint<'a>,
    /// Upper bound for one complete request/response exchange.
    pub timeout_ms: u32,
    /// Pause after each successful GET/PUT cycle.
    pub cycle_delay_ms: u32,
    /// Body of every PUT.
    pub put_payload: &'a str,
}

impl Config<'static> {
    /// The built-in configuration.
    pub const DEFAULT: Self = Self {
        endpoint: Endpoint::DEFAULT,
        timeout_ms: 3000,
        cycle_delay_ms: 5000,
        put_payload: "foobar",
    };
}

impl Default for Config<'_> {
    fn default() -> Self {
        Config::DEFAULT
    }
}

impl<'a> Config<'a> {
    /// Parse a JSON configuration document.
    pub fn from_json(json: &'a [u8]) -> Result<Self, serde_json_core::de::Error> {
        serde_json_core::from_slice(json).map(|(config, _)| config)
    }
}
