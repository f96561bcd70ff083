//! HTTP/1.1 client for embedded systems.
//!
//! A lightweight, allocation-free client that performs one request per
//! connection and streams the response to an observer instead of collecting
//! it. It is the piece the request loop hands its sockets to.
//!
//! # Features
//!
//! - Synchronous request/response model with an absolute deadline
//! - Fixed-size, caller-owned receive buffer reused across requests
//! - `Content-Length`, chunked and read-until-close response bodies
//! - GET, PUT and POST with optional payload, content type and extra headers
//!
//! # Usage
//!
//! ```rust,no_run
//! use core::ops::ControlFlow;
//! use iotloop::network::application::http::{Client, LogObserver, Method, Request, ResponseChunk};
//! # use iotloop::network::{Close, Connection, Read, Tcp, Write};
//! # use iotloop::network::error::Error;
//! # use iotloop::system::Clock;
//! # struct MockConnection;
//! # impl Connection for MockConnection {}
//! # impl Read for MockConnection {
//! #     type Error = Error;
//! #     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> { Ok(0) }
//! # }
//! # impl Write for MockConnection {
//! #     type Error = Error;
//! #     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> { Ok(buf.len()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl Close for MockConnection {
//! #     type Error = Error;
//! #     fn close(self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl Tcp for MockConnection {
//! #     fn set_read_timeout(&mut self, _timeout_ms: Option<u32>) -> Result<(), Error> { Ok(()) }
//! # }
//! # struct Ticks;
//! # impl Clock for Ticks {
//! #     fn now_ms(&self) -> u64 { 0 }
//! #     fn sleep_ms(&mut self, _ms: u32) {}
//! # }
//!
//! let mut client = Client::new(MockConnection, Ticks).with_timeout(3000);
//! let mut recv_buf = [0u8; 512];
//!
//! let request = Request::new(Method::Put, "/11", "192.168.0.103").with_body(b"foobar");
//! let _total = client.request(&request, &mut recv_buf, "PUT /11", &mut LogObserver)?;
//!
//! // Any closure works as an observer too.
//! let get = Request::new(Method::Get, "/11", "192.168.0.103");
//! let mut seen = 0;
//! client.request(&get, &mut recv_buf, "GET /11", &mut |chunk: &ResponseChunk<'_>| {
//!     seen += chunk.data.len();
//!     ControlFlow::Continue(())
//! })?;
//! client.close()?;
//! # Ok::<(), Error>(())
//! ```

mod chunked;

/// Request descriptor, framing and the client itself.
pub mod client;

/// Response chunks and observers.
pub mod response;

pub use client::{Client, Header, Method, Request};
pub use response::{Delivery, LogObserver, ResponseChunk, ResponseObserver};
