//! Scripted socket provider and clock shared by the integration tests.
//!
//! Every socket handed out by [`MockProvider`] plays back one [`Script`]. All
//! sockets, the clock and the recorded events live in one [`World`] so a test
//! can inspect ordering across connections.

#![allow(dead_code)]

use core::net::SocketAddrV4;
use core::ops::ControlFlow;
use iotloop::network::application::http::{ResponseChunk, ResponseObserver};
use iotloop::network::error::Error;
use iotloop::network::{Close, Connection, Read, SocketProvider, Tcp, Write};
use iotloop::system::Clock;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// One step of a socket's read side.
#[derive(Debug, Clone)]
pub enum ReadStep {
    /// Hand out these bytes, split over several reads if the buffer is short.
    Data(&'static [u8]),
    /// Advance the clock by the given milliseconds, then hand out the bytes.
    Late(u64, &'static [u8]),
    /// Nothing arrives: the clock runs to the read timeout and the read fails.
    Stall,
    /// Orderly shutdown by the peer.
    Eof,
    /// The read fails with this error.
    Fail(Error),
}

/// How one connection behaves.
#[derive(Debug, Clone, Default)]
pub struct Script {
    pub open_error: Option<i32>,
    pub connect_error: Option<i32>,
    pub write_error: bool,
    /// Milliseconds each write takes on the shared clock.
    pub write_delay_ms: u64,
    pub reads: Vec<ReadStep>,
}

impl Script {
    pub fn responding(reads: &[ReadStep]) -> Self {
        Self {
            reads: reads.to_vec(),
            ..Self::default()
        }
    }

    /// Answer with `response` in a single read.
    pub fn ok(response: &'static [u8]) -> Self {
        Self::responding(&[ReadStep::Data(response)])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Open(usize),
    Connect(usize, SocketAddrV4),
    Close(usize),
    Sleep(u32),
}

#[derive(Debug, Default)]
pub struct World {
    pub scripts: VecDeque<Script>,
    pub events: Vec<Event>,
    /// Bytes written on each socket, indexed by socket id.
    pub requests: Vec<Vec<u8>>,
    pub now_ms: u64,
    pub open: usize,
    pub max_open: usize,
    pub opened: usize,
    pub closed: usize,
}

pub type Shared = Rc<RefCell<World>>;

pub fn world(scripts: Vec<Script>) -> Shared {
    Rc::new(RefCell::new(World {
        scripts: scripts.into(),
        ..World::default()
    }))
}

#[derive(Debug, Clone)]
pub struct MockProvider {
    pub world: Shared,
}

#[derive(Debug)]
pub struct MockSocket {
    id: usize,
    world: Shared,
    script: Script,
    reads: VecDeque<ReadStep>,
    read_timeout_ms: Option<u32>,
}

impl MockSocket {
    /// A socket that is already connected, for driving the client directly.
    pub fn connected(world: &Shared, script: Script) -> Self {
        let mut w = world.borrow_mut();
        let id = w.requests.len();
        w.requests.push(Vec::new());
        w.open += 1;
        w.opened += 1;
        w.max_open = w.max_open.max(w.open);
        w.events.push(Event::Open(id));
        drop(w);
        Self {
            id,
            world: world.clone(),
            reads: script.reads.iter().cloned().collect(),
            script,
            read_timeout_ms: None,
        }
    }
}

impl SocketProvider for MockProvider {
    type Socket = MockSocket;

    fn open(&mut self) -> Result<Self::Socket, i32> {
        let script = self
            .world
            .borrow_mut()
            .scripts
            .pop_front()
            .expect("no script left for a new connection");
        if let Some(code) = script.open_error {
            return Err(code);
        }
        Ok(MockSocket::connected(&self.world, script))
    }

    fn connect(&mut self, socket: &mut Self::Socket, remote: SocketAddrV4) -> Result<(), i32> {
        self.world
            .borrow_mut()
            .events
            .push(Event::Connect(socket.id, remote));
        match socket.script.connect_error {
            Some(code) => Err(code),
            None => Ok(()),
        }
    }
}

impl Read for MockSocket {
    type Error = Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        match self.reads.pop_front() {
            None | Some(ReadStep::Eof) => Ok(0),
            Some(ReadStep::Data(data)) => Ok(self.hand_out(data, buf)),
            Some(ReadStep::Late(ms, data)) => {
                self.world.borrow_mut().now_ms += ms;
                Ok(self.hand_out(data, buf))
            }
            Some(ReadStep::Stall) => {
                let wait = self.read_timeout_ms.expect("stalled read without a timeout");
                self.world.borrow_mut().now_ms += u64::from(wait);
                Err(Error::Timeout)
            }
            Some(ReadStep::Fail(err)) => Err(err),
        }
    }
}

impl MockSocket {
    fn hand_out(&mut self, data: &'static [u8], buf: &mut [u8]) -> usize {
        let n = data.len().min(buf.len());
        buf[..n].copy_from_slice(&data[..n]);
        if n < data.len() {
            self.reads.push_front(ReadStep::Data(&data[n..]));
        }
        n
    }
}

impl Write for MockSocket {
    type Error = Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if self.script.write_error {
            return Err(Error::WriteError);
        }
        // Short writes exercise the client's write loop.
        let n = buf.len().min(7);
        let mut w = self.world.borrow_mut();
        w.now_ms += self.script.write_delay_ms;
        w.requests[self.id].extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Close for MockSocket {
    type Error = Error;

    fn close(self) -> Result<(), Self::Error> {
        let mut w = self.world.borrow_mut();
        w.open -= 1;
        w.closed += 1;
        w.events.push(Event::Close(self.id));
        Ok(())
    }
}

impl Connection for MockSocket {}

impl Tcp for MockSocket {
    fn set_read_timeout(&mut self, timeout_ms: Option<u32>) -> Result<(), Error> {
        self.read_timeout_ms = timeout_ms;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct MockClock {
    pub world: Shared,
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.world.borrow().now_ms
    }

    fn sleep_ms(&mut self, ms: u32) {
        let mut w = self.world.borrow_mut();
        w.now_ms += u64::from(ms);
        w.events.push(Event::Sleep(ms));
    }
}

/// What an observer saw, owned so it can outlive the receive buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seen {
    pub tag: String,
    pub status_code: u16,
    pub reason: String,
    pub data: Vec<u8>,
    pub body_len: usize,
    pub is_final: bool,
}

pub fn split_request(raw: &[u8]) -> (String, Vec<u8>) {
    let end = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("request head not terminated")
        + 4;
    (
        String::from_utf8(raw[..end].to_vec()).unwrap(),
        raw[end..].to_vec(),
    )
}

/// An observer that keeps a copy of every delivery.
#[derive(Debug, Default)]
pub struct Recorder {
    pub seen: Vec<Seen>,
}

impl ResponseObserver for Recorder {
    fn on_chunk(&mut self, chunk: &ResponseChunk<'_>) -> ControlFlow<()> {
        self.seen.push(Seen {
            tag: chunk.tag.to_string(),
            status_code: chunk.status_code,
            reason: chunk.reason.to_string(),
            data: chunk.data.to_vec(),
            body_len: chunk.body_len,
            is_final: chunk.is_final(),
        });
        ControlFlow::Continue(())
    }
}
