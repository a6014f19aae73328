//! Reassembly of newline-terminated lines from a byte stream.
//!
//! A single read may carry several lines, or only part of one. Bytes are
//! accumulated until a terminator arrives, and every complete line is drained
//! before the next read.

use bytes::{Buf, BytesMut};

/// Line terminator.
const NEWLINE: u8 = b'\n';

/// Longest partial line kept while waiting for its terminator.
///
/// The longest well-formed command is a START line of a few dozen bytes.
pub const MAX_LINE_LEN: usize = 1024;

/// Accumulates incoming bytes and yields complete lines.
#[derive(Debug)]
pub struct LineBuffer {
    buf: BytesMut,
    limit: usize,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::with_limit(MAX_LINE_LEN)
    }
}

impl LineBuffer {
    /// Create an empty buffer holding at most [`MAX_LINE_LEN`] unterminated bytes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with a custom partial-line limit.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            buf: BytesMut::new(),
            limit,
        }
    }

    /// Mutable access to the underlying buffer, for reading directly into it.
    pub fn buffer_mut(&mut self) -> &mut BytesMut {
        &mut self.buf
    }

    /// Take the next complete line, without its terminator.
    ///
    /// Invalid UTF-8 is replaced rather than rejected. Returns `None` until a
    /// terminator has been received.
    pub fn next_line(&mut self) -> Option<String> {
        let pos = self.buf.iter().position(|&b| b == NEWLINE)?;
        let line = self.buf.split_to(pos);
        self.buf.advance(1);
        Some(String::from_utf8_lossy(&line).into_owned())
    }

    /// Number of buffered bytes not yet forming a complete line.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Partial-line limit in bytes.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Check whether the unterminated tail has grown past the limit.
    ///
    /// Only meaningful once every complete line has been drained.
    pub fn is_overflowing(&self) -> bool {
        self.buf.len() > self.limit
    }
}
