//! # iotloop - periodic HTTP client for IoT devices
//!
//! A small Rust crate that keeps a device talking to one HTTP resource: every
//! cycle it GETs the resource, PUTs a fixed payload back, logs what came back,
//! and sleeps. It runs until a request fails. The crate is designed for
//! embedded systems and supports `no_std` environments.
//!
//! ## Features
//!
//! - **Request loop**: GET/PUT/sleep state machine with one fresh TCP
//!   connection per request and no descriptor leaks on any failure path
//! - **HTTP Client**: allocation-free HTTP/1.1 client that streams responses
//!   to an observer through a fixed 512 byte receive buffer
//! - **Platform seams**: socket provider and clock traits, with `std`
//!   implementations behind the `std` feature
//! - **Configuration**: built-in defaults, optionally loaded from JSON
//!
//! ## Usage
//!
//! ```rust,no_run
//! # #[cfg(feature = "std")]
//! # fn main() {
//! use iotloop::config::Config;
//! use iotloop::network::application::http::LogObserver;
//! use iotloop::network::std_net::StdSocketProvider;
//! use iotloop::request_loop::RequestLoop;
//! use iotloop::system::StdClock;
//!
//! let mut request_loop = RequestLoop::new(
//!     Config::DEFAULT,
//!     StdSocketProvider,
//!     StdClock::new(),
//!     LogObserver,
//! );
//!
//! // Only returns once a request fails.
//! let err = request_loop.run().unwrap_err();
//! eprintln!("stopped: {}", err);
//! # }
//! # #[cfg(not(feature = "std"))]
//! # fn main() {}
//! ```
//!
//! ## Platform Support
//!
//! This library is designed to work on:
//! - Embedded microcontrollers with a TCP/IP stack (implement
//!   [`network::SocketProvider`], [`network::Tcp`] and [`system::Clock`])
//! - Linux-based IoT devices through the `std` feature
//!
//! ## Optional Features
//!
//! - `std`: Enable standard library support: `std::net` sockets, a
//!   `std::time` clock and the `iotloop` binary (default: disabled)
//! - `defmt`: Enable defmt formatting of errors and loop states

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

/// Loop configuration: endpoint, timing and payload.
pub mod config;

/// Network abstraction layer: socket traits, connection establishment and
/// the HTTP client.
pub mod network;

/// The GET/PUT/sleep request loop.
pub mod request_loop;

/// Platform services other than networking.
pub mod system;
