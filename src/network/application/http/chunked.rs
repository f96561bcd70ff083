//! Incremental `Transfer-Encoding: chunked` decoder.
//!
//! The decoder works in place: the receive buffer holds raw wire bytes on
//! entry and the decoded body bytes, packed at the front, on return. Output is
//! never longer than input, so no second buffer is needed. State carries over
//! between calls, so chunk-size lines and CRLFs may be split across reads.

use crate::network::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Size { value: usize, has_digits: bool },
    Extension { value: usize },
    SizeLf { value: usize },
    Data { remaining: usize },
    DataCr,
    DataLf,
    TrailerStart,
    TrailerLine,
    TrailerLf,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ChunkedDecoder {
    state: State,
}

impl ChunkedDecoder {
    pub(crate) fn new() -> Self {
        Self {
            state: State::Size {
                value: 0,
                has_digits: false,
            },
        }
    }

    /// `true` once the terminating zero-size chunk and trailers were consumed.
    pub(crate) fn is_done(&self) -> bool {
        self.state == State::Done
    }

    /// Decode `buf` in place and return how many body bytes now start it.
    ///
    /// Bytes following the end of the chunked body are ignored.
    pub(crate) fn decode(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let mut read = 0;
        let mut written = 0;

        while read < buf.len() && self.state != State::Done {
            if let State::Data { remaining } = self.state {
                let take = remaining.min(buf.len() - read);
                buf.copy_within(read..read + take, written);
                read += take;
                written += take;
                self.state = if take == remaining {
                    State::DataCr
                } else {
                    State::Data {
                        remaining: remaining - take,
                    }
                };
            } else {
                self.state = self.next(buf[read])?;
                read += 1;
            }
        }

        Ok(written)
    }

    fn next(&self, byte: u8) -> Result<State, Error> {
        let state = match (self.state, byte) {
            (State::Size { value, .. }, b) if hex_value(b).is_some() => {
                let digit = hex_value(b).unwrap_or_default();
                let value = value
                    .checked_mul(16)
                    .and_then(|v| v.checked_add(digit))
                    .ok_or(Error::ProtocolError)?;
                State::Size {
                    value,
                    has_digits: true,
                }
            }
            (State::Size { has_digits: false, .. }, _) => return Err(Error::ProtocolError),
            (State::Size { value, .. }, b'\r') => State::SizeLf { value },
            (State::Size { value, .. }, b'\n') => end_of_size_line(value),
            (State::Size { value, .. }, b';' | b' ' | b'\t') => State::Extension { value },
            (State::Extension { value }, b'\n') => end_of_size_line(value),
            (State::Extension { value }, _) => State::Extension { value },
            (State::SizeLf { value }, b'\n') => end_of_size_line(value),
            (State::DataCr, b'\r') => State::DataLf,
            (State::DataCr, b'\n') | (State::DataLf, b'\n') => ChunkedDecoder::new().state,
            (State::TrailerStart, b'\r') => State::TrailerLf,
            (State::TrailerStart, b'\n') | (State::TrailerLf, b'\n') => State::Done,
            (State::TrailerStart, _) => State::TrailerLine,
            (State::TrailerLine, b'\n') => State::TrailerStart,
            (State::TrailerLine, _) => State::TrailerLine,
            _ => return Err(Error::ProtocolError),
        };
        Ok(state)
    }
}

fn end_of_size_line(value: usize) -> State {
    if value == 0 {
        State::TrailerStart
    } else {
        State::Data { remaining: value }
    }
}

fn hex_value(byte: u8) -> Option<usize> {
    (byte as char).to_digit(16).map(|d| d as usize)
}
