use super::chunked::ChunkedDecoder;
use super::response::{Delivery, ResponseChunk, ResponseObserver};
use crate::network::Tcp;
use crate::network::error::Error;
use crate::system::Clock;
use core::fmt::Write as _;
use heapless::{String, Vec};
use log::debug;

/// Largest request line plus headers the client will frame.
pub const MAX_REQUEST_HEAD_LEN: usize = 512;
/// Reason phrases longer than this are truncated.
pub const MAX_REASON_LEN: usize = 32;
/// Request timeout used unless [`Client::with_timeout`] overrides it.
pub const DEFAULT_TIMEOUT_MS: u32 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    /// The method token as sent on the request line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

/// Everything needed to frame one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request<'a> {
    pub method: Method,
    pub path: &'a str,
    pub host: &'a str,
    pub protocol: &'a str,
    pub headers: &'a [Header<'a>],
    pub content_type: Option<&'a str>,
    pub body: Option<&'a [u8]>,
}

impl<'a> Request<'a> {
    /// An HTTP/1.1 request without body or extra headers.
    pub fn new(method: Method, path: &'a str, host: &'a str) -> Self {
        Self {
            method,
            path,
            host,
            protocol: "HTTP/1.1",
            headers: &[],
            content_type: None,
            body: None,
        }
    }

    pub fn with_protocol(mut self, protocol: &'a str) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn with_body(mut self, body: &'a [u8]) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_content_type(mut self, content_type: &'a str) -> Self {
        self.content_type = Some(content_type);
        self
    }

    pub fn with_headers(mut self, headers: &'a [Header<'a>]) -> Self {
        self.headers = headers;
        self
    }

    /// Serialize the request line and headers, including the blank line.
    pub fn encode_head(&self) -> Result<Vec<u8, MAX_REQUEST_HEAD_LEN>, Error> {
        let mut head = Vec::new();

        // Request line
        push(&mut head, self.method.as_str().as_bytes())?;
        push(&mut head, b" ")?;
        push(&mut head, self.path.as_bytes())?;
        push(&mut head, b" ")?;
        push(&mut head, self.protocol.as_bytes())?;
        push(&mut head, b"\r\n")?;

        // Headers
        if !self.headers.iter().any(|h| h.name.eq_ignore_ascii_case("Host")) {
            push_header(&mut head, "Host", self.host)?;
        }
        for header in self.headers {
            push_header(&mut head, header.name, header.value)?;
        }
        if let Some(content_type) = self.content_type {
            push_header(&mut head, "Content-Type", content_type)?;
        }
        if let Some(body) = self.body {
            let mut len_str: String<20> = String::new();
            write!(len_str, "{}", body.len()).map_err(|_| Error::BufferOverflow)?;
            push_header(&mut head, "Content-Length", &len_str)?;
        }

        push(&mut head, b"\r\n")?;
        Ok(head)
    }
}

fn push(buf: &mut Vec<u8, MAX_REQUEST_HEAD_LEN>, bytes: &[u8]) -> Result<(), Error> {
    buf.extend_from_slice(bytes).map_err(|_| Error::BufferOverflow)
}

fn push_header(buf: &mut Vec<u8, MAX_REQUEST_HEAD_LEN>, name: &str, value: &str) -> Result<(), Error> {
    push(buf, name.as_bytes())?;
    push(buf, b": ")?;
    push(buf, value.as_bytes())?;
    push(buf, b"\r\n")
}

/// How the end of the response body is recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Framing {
    Empty,
    Length(usize),
    Chunked(ChunkedDecoder),
    UntilClose,
}

#[derive(Debug)]
struct Head {
    status_code: u16,
    reason: String<MAX_REASON_LEN>,
    framing: Framing,
}

/// A synchronous HTTP/1.1 client bound to one connection.
///
/// The client performs one request per connection. Response data is streamed
/// through a caller-owned receive buffer and handed to a
/// [`ResponseObserver`]; the status line and headers must fit in that buffer.
#[derive(Debug)]
pub struct Client<C: Tcp, K: Clock> {
    connection: C,
    clock: K,
    timeout_ms: u32,
}

impl<C: Tcp, K: Clock> Client<C, K> {
    pub fn new(connection: C, clock: K) -> Self {
        Self {
            connection,
            clock,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Bound each request to `timeout_ms`, measured from the start of the
    /// request to the final delivery.
    pub fn with_timeout(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Close the underlying connection.
    pub fn close(self) -> Result<(), Error> {
        self.connection.close()
    }

    /// Send `request` and stream the response to `observer`.
    ///
    /// Blocks until the response is complete, the timeout elapses, or the
    /// connection fails. Returns the number of body bytes received.
    pub fn request<O: ResponseObserver + ?Sized>(
        &mut self,
        request: &Request,
        recv_buf: &mut [u8],
        tag: &str,
        observer: &mut O,
    ) -> Result<usize, Error> {
        let deadline = self.clock.now_ms().saturating_add(u64::from(self.timeout_ms));

        debug!("[{}] Sending {} {}", tag, request.method.as_str(), request.path);
        let head = request.encode_head()?;
        self.write_all(&head, deadline)?;
        if let Some(body) = request.body {
            self.write_all(body, deadline)?;
        }
        self.connection.flush()?;

        let (head, pending) = self.read_head(recv_buf, deadline)?;
        debug!("[{}] Response status {} {}", tag, head.status_code, head.reason);
        self.read_body(head, recv_buf, pending, deadline, tag, observer)
    }

    /// Writes `bytes`, giving up once the deadline has passed between writes.
    ///
    /// A single blocked write is bounded only by the platform socket.
    fn write_all(&mut self, mut bytes: &[u8], deadline: u64) -> Result<(), Error> {
        while !bytes.is_empty() {
            if self.clock.now_ms() >= deadline {
                return Err(Error::Timeout);
            }
            match self.connection.write(bytes) {
                Ok(0) => return Err(Error::WriteError),
                Ok(n) => bytes = &bytes[n..],
                Err(Error::Timeout) => return Err(Error::Timeout),
                Err(_) => return Err(Error::WriteError),
            }
        }
        Ok(())
    }

    /// One read bounded by what is left of the deadline.
    fn read_some(&mut self, buf: &mut [u8], deadline: u64) -> Result<usize, Error> {
        let now = self.clock.now_ms();
        if now >= deadline {
            return Err(Error::Timeout);
        }
        let remaining = u32::try_from(deadline - now).unwrap_or(u32::MAX);
        self.connection.set_read_timeout(Some(remaining))?;
        self.connection.read(buf)
    }

    /// Read until a final (non-1xx) response head is buffered.
    ///
    /// On success the body bytes that arrived along with the head are moved to
    /// the front of `buf`; their count is returned next to the parsed head.
    fn read_head(&mut self, buf: &mut [u8], deadline: u64) -> Result<(Head, usize), Error> {
        let mut filled = 0;
        loop {
            let head_len = match find_slice(&buf[..filled], b"\r\n\r\n") {
                Some(pos) => pos + 4,
                None => {
                    if filled == buf.len() {
                        debug!("Response head exceeds {} byte receive buffer", buf.len());
                        return Err(Error::BufferOverflow);
                    }
                    match self.read_some(&mut buf[filled..], deadline)? {
                        0 => return Err(Error::ConnectionClosed),
                        n => filled += n,
                    }
                    continue;
                }
            };

            let head = parse_head(&buf[..head_len])?;
            buf.copy_within(head_len..filled, 0);
            filled -= head_len;

            // Interim responses carry no body; the real one follows.
            if (100..200).contains(&head.status_code) {
                continue;
            }
            return Ok((head, filled));
        }
    }

    fn read_body<O: ResponseObserver + ?Sized>(
        &mut self,
        mut head: Head,
        buf: &mut [u8],
        mut pending: usize,
        deadline: u64,
        tag: &str,
        observer: &mut O,
    ) -> Result<usize, Error> {
        let mut body_len = 0;
        loop {
            let (len, done) = match &mut head.framing {
                Framing::Empty => (0, true),
                Framing::Length(remaining) => {
                    let take = pending.min(*remaining);
                    *remaining -= take;
                    (take, *remaining == 0)
                }
                Framing::Chunked(decoder) => {
                    let len = decoder.decode(&mut buf[..pending])?;
                    (len, decoder.is_done())
                }
                Framing::UntilClose => (pending, false),
            };
            body_len += len;

            let delivery = if done { Delivery::Final } else { Delivery::Partial };
            if done || len > 0 {
                let chunk = ResponseChunk {
                    tag,
                    status_code: head.status_code,
                    reason: &head.reason,
                    data: &buf[..len],
                    body_len,
                    delivery,
                };
                if observer.on_chunk(&chunk).is_break() && !done {
                    debug!("[{}] Aborted by observer", tag);
                    return Err(Error::Aborted);
                }
            }
            if done {
                return Ok(body_len);
            }

            pending = self.read_some(buf, deadline)?;
            if pending == 0 {
                if head.framing != Framing::UntilClose {
                    return Err(Error::ConnectionClosed);
                }
                let chunk = ResponseChunk {
                    tag,
                    status_code: head.status_code,
                    reason: &head.reason,
                    data: &[],
                    body_len,
                    delivery: Delivery::Final,
                };
                let _ = observer.on_chunk(&chunk);
                return Ok(body_len);
            }
        }
    }
}

fn parse_head(data: &[u8]) -> Result<Head, Error> {
    let header_str = core::str::from_utf8(data).map_err(|_| Error::ProtocolError)?;
    let mut lines = header_str.lines();

    // Parse status line
    let status_line = lines.next().ok_or(Error::ProtocolError)?;
    let mut status_parts = status_line.splitn(3, ' ');
    let version = status_parts.next().ok_or(Error::ProtocolError)?;
    if !version.starts_with("HTTP/") {
        return Err(Error::ProtocolError);
    }
    let status_code_str = status_parts.next().ok_or(Error::ProtocolError)?;
    if status_code_str.len() != 3 || !status_code_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::ProtocolError);
    }
    let status_code = status_code_str
        .parse::<u16>()
        .map_err(|_| Error::ProtocolError)?;

    let mut reason = String::new();
    for c in status_parts.next().unwrap_or("").trim().chars() {
        if reason.push(c).is_err() {
            break;
        }
    }

    // Parse headers
    let mut content_length: Option<usize> = None;
    let mut chunked = false;
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let mut parts = line.splitn(2, ':');
        let name = parts.next().ok_or(Error::ProtocolError)?.trim();
        let value = parts.next().ok_or(Error::ProtocolError)?.trim();

        if name.eq_ignore_ascii_case("Content-Length") {
            content_length = Some(value.parse::<usize>().map_err(|_| Error::ProtocolError)?);
        } else if name.eq_ignore_ascii_case("Transfer-Encoding") {
            chunked = value
                .rsplit(',')
                .next()
                .is_some_and(|coding| coding.trim().eq_ignore_ascii_case("chunked"));
        }
    }

    let framing = match status_code {
        100..=199 | 204 | 304 => Framing::Empty,
        _ if chunked => Framing::Chunked(ChunkedDecoder::new()),
        _ => match content_length {
            Some(len) => Framing::Length(len),
            None => Framing::UntilClose,
        },
    };

    Ok(Head {
        status_code,
        reason,
        framing,
    })
}

/// Finds the first occurrence of a slice in another slice and returns its starting position.
fn find_slice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
