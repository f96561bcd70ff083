//! Response delivery: the values handed to a [`ResponseObserver`] while a
//! request is in flight, and the observer that logs them.

use core::ops::ControlFlow;
use log::info;

/// Whether more response data follows a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// More body data is pending.
    Partial,
    /// The response is complete. Delivered exactly once per response.
    Final,
}

/// A view of the response at one delivery point.
///
/// `data` borrows the receive buffer and is only valid for the duration of the
/// observer call; the buffer is overwritten by the next read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseChunk<'a> {
    /// Caller-supplied label of the request this response belongs to.
    pub tag: &'a str,
    /// Numeric status code.
    pub status_code: u16,
    /// Reason phrase of the status line, possibly truncated.
    pub reason: &'a str,
    /// Body bytes delivered by this call.
    pub data: &'a [u8],
    /// Body bytes delivered so far, including `data`.
    pub body_len: usize,
    /// Partial or final delivery.
    pub delivery: Delivery,
}

impl ResponseChunk<'_> {
    /// `true` for the last delivery of a response.
    pub fn is_final(&self) -> bool {
        self.delivery == Delivery::Final
    }
}

/// Receives response data as it arrives.
///
/// Returning [`ControlFlow::Break`] from a partial delivery makes the client
/// stop reading and fail the request with
/// [`Error::Aborted`](crate::network::error::Error::Aborted). The return value
/// of the final delivery is ignored; the response is already complete.
pub trait ResponseObserver {
    /// Called once per delivery.
    fn on_chunk(&mut self, chunk: &ResponseChunk<'_>) -> ControlFlow<()>;
}

impl<F> ResponseObserver for F
where
    F: FnMut(&ResponseChunk<'_>) -> ControlFlow<()>,
{
    fn on_chunk(&mut self, chunk: &ResponseChunk<'_>) -> ControlFlow<()> {
        self(chunk)
    }
}

/// Logs every delivery at info level and never aborts.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl ResponseObserver for LogObserver {
    fn on_chunk(&mut self, chunk: &ResponseChunk<'_>) -> ControlFlow<()> {
        match chunk.delivery {
            Delivery::Partial => {
                info!("[{}] Partial data received ({} bytes)", chunk.tag, chunk.data.len());
            }
            Delivery::Final => {
                info!(
                    "[{}] All data received ({} bytes), HTTP status: {} {}",
                    chunk.tag, chunk.body_len, chunk.status_code, chunk.reason
                );
            }
        }
        ControlFlow::Continue(())
    }
}
