//! Message framing on top of a byte transport
//!
//! A message ends where its JSON value ends, so commands may arrive back to
//! back with nothing in between. Whitespace (including `\r\n` and blank lines)
//! between messages is skipped. A newline also closes a value that is not
//! complete, which keeps one broken line from swallowing the next command.
//!
//! A fragment still incomplete when the transport reports a read timeout is
//! dropped, the same way a stream parser gives up on a stalled message.

use super::document::DOCUMENT_CAPACITY;
use super::ring_buffer::RingBuffer;
use crate::error::{Error, Result};
use crate::transport::Transport;
use serde::de::IgnoredAny;

/// Staging capacity: one full message plus read chunks
const BUFFER_SIZE: usize = 2 * DOCUMENT_CAPACITY;

/// Bytes requested from the transport per read
const READ_CHUNK: usize = 64;

/// Outcome of scanning the front of the buffer
enum Scan {
    /// One JSON value of this many bytes
    Complete(usize),
    /// Bytes that can never become JSON
    Invalid,
    /// Valid so far, more bytes needed
    Incomplete,
}

/// Splits a byte stream into JSON messages
///
/// All storage is inline, so reading messages never allocates.
pub struct MessageReader {
    buffer: RingBuffer<BUFFER_SIZE>,
    /// Contiguous copy of the buffered bytes for the JSON scanner
    window: [u8; BUFFER_SIZE],
    chunk: [u8; READ_CHUNK],
    /// Inside an oversized message that was already reported
    discarding: bool,
}

impl MessageReader {
    pub fn new() -> Self {
        Self {
            buffer: RingBuffer::new(),
            window: [0u8; BUFFER_SIZE],
            chunk: [0u8; READ_CHUNK],
            discarding: false,
        }
    }

    /// Read the next message
    ///
    /// Returns `Ok(None)` once the transport has no more bytes to give
    /// (a serial read timeout), dropping any incomplete fragment. A message
    /// longer than [`DOCUMENT_CAPACITY`] is reported once as
    /// [`Error::MessageTooLarge`] and its remaining bytes are skipped up to
    /// the next newline or read timeout.
    ///
    /// The returned bytes are either one complete JSON value or a rejected
    /// segment that the decoder will refuse.
    pub fn read_message<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
    ) -> Result<Option<&[u8]>> {
        loop {
            if let Some(len) = self.next_frame()? {
                return Ok(Some(&self.window[..len]));
            }

            let n = transport.read(&mut self.chunk)?;
            if n == 0 {
                self.drop_partial();
                return Ok(None);
            }
            self.buffer.extend(&self.chunk[..n]);
        }
    }

    /// Number of buffered bytes not yet returned as a message
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Split one message off the front of the buffer into `self.window`
    fn next_frame(&mut self) -> Result<Option<usize>> {
        if self.discarding {
            let Some(pos) = self.buffer.find(b'\n') else {
                self.buffer.clear();
                return Ok(None);
            };
            self.buffer.advance(pos + 1);
            self.discarding = false;
        }

        self.skip_separators();
        if self.buffer.is_empty() {
            return Ok(None);
        }

        let len = self.buffer.len();
        self.buffer.copy_front(&mut self.window[..len]);
        let line_end = self.window[..len].iter().position(|&b| b == b'\n');
        let scan_len = line_end.unwrap_or(len);

        let scan = {
            let mut values = serde_json::Deserializer::from_slice(&self.window[..scan_len])
                .into_iter::<IgnoredAny>();
            match values.next() {
                Some(Ok(_)) => Scan::Complete(values.byte_offset()),
                Some(Err(e)) if !e.is_eof() => Scan::Invalid,
                _ => Scan::Incomplete,
            }
        };

        let end = match (scan, line_end) {
            (Scan::Complete(end), _) => end,
            (Scan::Invalid, _) => self.resync_point(len, line_end),
            (Scan::Incomplete, Some(pos)) => pos,
            (Scan::Incomplete, None) => return self.check_overflow(len),
        };

        self.buffer.advance(end);

        let mut frame_len = end;
        while frame_len > 0 && self.window[frame_len - 1].is_ascii_whitespace() {
            frame_len -= 1;
        }
        if frame_len > DOCUMENT_CAPACITY {
            return Err(Error::MessageTooLarge {
                len: frame_len,
                max: DOCUMENT_CAPACITY,
            });
        }
        Ok(Some(frame_len))
    }

    /// End of a segment that cannot be JSON: the newline, else the next `{`
    fn resync_point(&self, len: usize, line_end: Option<usize>) -> usize {
        line_end
            .or_else(|| {
                self.window[1..len]
                    .iter()
                    .position(|&b| b == b'{')
                    .map(|i| i + 1)
            })
            .unwrap_or(len)
    }

    fn skip_separators(&mut self) {
        while let Some(b) = self.buffer.get(0) {
            if !b.is_ascii_whitespace() {
                break;
            }
            self.buffer.advance(1);
        }
    }

    /// Incomplete message: give up on it once it cannot fit anymore
    fn check_overflow(&mut self, len: usize) -> Result<Option<usize>> {
        if len <= DOCUMENT_CAPACITY {
            return Ok(None);
        }

        self.buffer.clear();
        self.discarding = true;
        Err(Error::MessageTooLarge {
            len,
            max: DOCUMENT_CAPACITY,
        })
    }

    fn drop_partial(&mut self) {
        if !self.buffer.is_empty() && !self.discarding {
            log::debug!(
                "Read timed out, dropping {} bytes of incomplete message",
                self.buffer.len()
            );
        }
        self.buffer.clear();
        self.discarding = false;
    }
}

impl Default for MessageReader {
    fn default() -> Self {
        Self::new()
    }
}
