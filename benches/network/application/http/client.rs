use criterion::{Criterion, Throughput};
use iotloop::network::application::http::{Client, LogObserver, Method, Request};
use iotloop::network::error::Error;
use iotloop::network::{Close, Connection, Read, Tcp, Write};
use iotloop::system::Clock;
use std::hint::black_box;

/// Replays a canned response, `segment` bytes per read.
struct LoopbackConnection {
    response: &'static [u8],
    pos: usize,
    segment: usize,
}

impl Read for LoopbackConnection {
    type Error = Error;
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let n = buf.len().min(self.segment).min(self.response.len() - self.pos);
        buf[..n].copy_from_slice(&self.response[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

impl Write for LoopbackConnection {
    type Error = Error;
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Close for LoopbackConnection {
    type Error = Error;
    fn close(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Connection for LoopbackConnection {}

impl Tcp for LoopbackConnection {
    fn set_read_timeout(&mut self, _timeout_ms: Option<u32>) -> Result<(), Error> {
        Ok(())
    }
}

struct FrozenClock;

impl Clock for FrozenClock {
    fn now_ms(&self) -> u64 {
        0
    }

    fn sleep_ms(&mut self, _ms: u32) {}
}

fn chunked_response() -> &'static [u8] {
    let mut raw = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n".to_vec();
    for _ in 0..64 {
        raw.extend_from_slice(b"40\r\n");
        raw.extend_from_slice(&[b'x'; 64]);
        raw.extend_from_slice(b"\r\n");
    }
    raw.extend_from_slice(b"0\r\n\r\n");
    Box::leak(raw.into_boxed_slice())
}

fn length_response() -> &'static [u8] {
    let mut raw = b"HTTP/1.1 200 OK\r\nContent-Length: 4096\r\n\r\n".to_vec();
    raw.extend_from_slice(&[b'x'; 4096]);
    Box::leak(raw.into_boxed_slice())
}

pub fn bench_encode_head(c: &mut Criterion) {
    let request = Request::new(Method::Put, "/11", "192.168.0.103").with_body(b"foobar");
    c.bench_function("encode_head", |b| {
        b.iter(|| black_box(&request).encode_head().expect("head fits"))
    });
}

fn bench_response(c: &mut Criterion, name: &str, response: &'static [u8]) {
    let mut group = c.benchmark_group(name);
    group.throughput(Throughput::Bytes(response.len() as u64));
    let request = Request::new(Method::Get, "/11", "192.168.0.103");
    for segment in [64usize, 1460] {
        group.bench_function(format!("segment_{}", segment), |b| {
            let mut recv_buf = [0u8; 512];
            b.iter(|| {
                let connection = LoopbackConnection {
                    response,
                    pos: 0,
                    segment,
                };
                let mut client = Client::new(connection, FrozenClock);
                client
                    .request(&request, &mut recv_buf, "GET /11", &mut LogObserver)
                    .expect("request failed")
            })
        });
    }
    group.finish();
}

pub fn bench_content_length_response(c: &mut Criterion) {
    bench_response(c, "content_length_response", length_response());
}

pub fn bench_chunked_response(c: &mut Criterion) {
    bench_response(c, "chunked_response", chunked_response());
}
