#![deny(unsafe_code)]

//! # Periodic GET/PUT request loop
//!
//! The loop talks to a single [`Endpoint`](crate::config::Endpoint): it
//! fetches the resource, writes a fixed payload back, waits, and starts over.
//! Each request gets its own TCP connection, which is closed before the next
//! one is opened, so at most one socket exists at any time.
//!
//! ## Design
//!
//! The loop is a state machine advanced one transition at a time by
//! [`RequestLoop::step`]. The state names the phase the loop is in:
//!
//! * `Idle`: between cycles. The next step sends the GET.
//! * `GetInFlight`: the GET is being (or has just been) exchanged. The next
//!   step sends the PUT.
//! * `PutInFlight`: the PUT is being (or has just been) exchanged. The next
//!   step sleeps.
//! * `Sleeping`: the inter-cycle delay. The next step starts a new cycle.
//! * `Stopped`: a request failed. Terminal.
//!
//! Any error while a request is in flight is fatal: the socket is released,
//! the error is logged, and the loop stops. There is no retry.

use crate::config::{Config, RECV_BUF_LEN};
use crate::network::SocketProvider;
use crate::network::application::http::{Client, Method, Request, ResponseObserver};
use crate::network::error::Error;
use crate::network::socket;
use crate::system::Clock;
use core::convert::Infallible;
use log::{debug, error, info};

/// Phase of the request loop.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum State {
    /// Waiting to start a cycle.
    Idle,
    /// Exchanging the GET request.
    GetInFlight,
    /// Exchanging the PUT request.
    PutInFlight,
    /// Waiting out the inter-cycle delay.
    Sleeping,
    /// A request failed; the loop will not run again.
    Stopped,
}

#[cfg(feature = "defmt")]
impl defmt::Format for State {
    fn format(&self, f: defmt::Formatter) {
        match self {
            State::Idle => defmt::write!(f, "Idle"),
            State::GetInFlight => defmt::write!(f, "GetInFlight"),
            State::PutInFlight => defmt::write!(f, "PutInFlight"),
            State::Sleeping => defmt::write!(f, "Sleeping"),
            State::Stopped => defmt::write!(f, "Stopped"),
        }
    }
}

/// Largest tag the loop builds for its requests; longer ones are cut short.
const MAX_TAG_LEN: usize = 64;

/// The request loop.
///
/// Owns the platform pieces, the receive buffer and the response observer for
/// its whole lifetime.
#[derive(Debug)]
pub struct RequestLoop<'a, P: SocketProvider, K: Clock, O: ResponseObserver> {
    config: Config<'a>,
    provider: P,
    clock: K,
    observer: O,
    recv_buf: [u8; RECV_BUF_LEN],
    state: State,
    cycles: u32,
}

impl<'a, P: SocketProvider, K: Clock, O: ResponseObserver> RequestLoop<'a, P, K, O> {
    /// Creates a loop in the `Idle` state.
    pub fn new(config: Config<'a>, provider: P, clock: K, observer: O) -> Self {
        Self {
            config,
            provider,
            clock,
            observer,
            recv_buf: [0; RECV_BUF_LEN],
            state: State::Idle,
            cycles: 0,
        }
    }

    /// Returns the current state of the loop.
    pub fn state(&self) -> State {
        self.state
    }

    /// Number of fully completed GET/PUT/sleep cycles.
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// The response observer.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Performs one state transition.
    ///
    /// Returns the error that stopped the loop, or [`Error::Stopped`] when
    /// called on a loop that has already stopped.
    pub fn step(&mut self) -> Result<(), Error> {
        match self.state {
            State::Idle => {
                self.state = State::GetInFlight;
                self.exchange(Method::Get)
            }
            State::GetInFlight => {
                self.state = State::PutInFlight;
                self.exchange(Method::Put)
            }
            State::PutInFlight => {
                self.state = State::Sleeping;
                debug!("Sleeping {} ms", self.config.cycle_delay_ms);
                self.clock.sleep_ms(self.config.cycle_delay_ms);
                Ok(())
            }
            State::Sleeping => {
                self.state = State::Idle;
                self.cycles = self.cycles.wrapping_add(1);
                Ok(())
            }
            State::Stopped => Err(Error::Stopped),
        }
    }

    /// Runs cycles until a request fails and returns that failure.
    pub fn run(&mut self) -> Result<Infallible, Error> {
        info!(
            "Starting request loop against {}:{}{}",
            self.config.endpoint.address, self.config.endpoint.port, self.config.endpoint.path
        );
        loop {
            self.step()?;
        }
    }

    /// Connects, performs one request, and closes the connection.
    fn exchange(&mut self, method: Method) -> Result<(), Error> {
        let endpoint = self.config.endpoint;
        let mut tag = heapless::String::<MAX_TAG_LEN>::new();
        for part in [method.as_str(), " ", endpoint.path] {
            for c in part.chars() {
                if tag.push(c).is_err() {
                    break;
                }
            }
        }

        let mut request = Request::new(method, endpoint.path, endpoint.address)
            .with_protocol(endpoint.protocol);
        if method == Method::Put {
            request = request.with_body(self.config.put_payload.as_bytes());
        }

        let result = socket::connect(&mut self.provider, &endpoint).and_then(|connection| {
            let mut client =
                Client::new(connection, &mut self.clock).with_timeout(self.config.timeout_ms);
            let outcome = client.request(&request, &mut self.recv_buf, &tag, &mut self.observer);
            // Close on every path; a request error outranks a close error.
            let closed = client.close();
            outcome.and_then(|body_len| closed.map(|()| body_len))
        });

        match result {
            Ok(body_len) => {
                debug!("[{}] Completed ({} body bytes)", tag, body_len);
                Ok(())
            }
            Err(err) => {
                error!("[{}] Request failed: {}", tag, err);
                self.state = State::Stopped;
                Err(err)
            }
        }
    }
}
