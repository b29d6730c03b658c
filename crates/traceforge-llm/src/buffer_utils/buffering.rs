use crate::error::{LlmError, Result};
use std::collections::VecDeque;

/// Circular buffer for line-based parsing of a byte stream
pub struct CircularLineBuffer {
    buffer: VecDeque<u8>,
}

impl CircularLineBuffer {
    /// Create a new buffer with specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
        }
    }

    /// Add bytes to the buffer
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buffer.extend(bytes);
    }

    /// Extract next line (up to \n) from buffer, trimmed.
    /// Returns None if no complete line is available
    pub fn next_line(&mut self) -> Option<Result<String>> {
        let newline_pos = self.buffer.iter().position(|&b| b == b'\n')?;
        let line_bytes: Vec<u8> = self.buffer.drain(..=newline_pos).collect();

        match std::str::from_utf8(&line_bytes) {
            Ok(line_str) => Some(Ok(line_str.trim().to_string())),
            Err(e) => Some(Err(LlmError::Stream(format!("Invalid UTF-8: {}", e)))),
        }
    }

    /// Terminate whatever partial line is pending so `next_line` can return it.
    /// Used once the connection has closed.
    pub fn finish(&mut self) {
        if !self.buffer.is_empty() {
            self.buffer.push_back(b'\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circular_buffer_basic() {
        let mut buffer = CircularLineBuffer::with_capacity(64);

        buffer.extend(b"line1\nline2\n");

        assert_eq!(buffer.next_line().unwrap().unwrap(), "line1");
        assert_eq!(buffer.next_line().unwrap().unwrap(), "line2");
        assert!(buffer.next_line().is_none());

        // fully drained, so finishing adds no phantom line
        buffer.finish();
        assert!(buffer.next_line().is_none());
    }

    #[test]
    fn test_partial_line() {
        let mut buffer = CircularLineBuffer::with_capacity(64);

        buffer.extend(b"partial");
        assert!(buffer.next_line().is_none());

        buffer.extend(b" line\n");
        assert_eq!(buffer.next_line().unwrap().unwrap(), "partial line");
    }

    #[test]
    fn test_crlf_is_trimmed() {
        let mut buffer = CircularLineBuffer::with_capacity(64);

        buffer.extend(b"data: x\r\n");
        assert_eq!(buffer.next_line().unwrap().unwrap(), "data: x");
    }

    #[test]
    fn test_finish_flushes_tail() {
        let mut buffer = CircularLineBuffer::with_capacity(64);

        buffer.extend(b"data: tail");
        buffer.finish();
        assert_eq!(buffer.next_line().unwrap().unwrap(), "data: tail");

        // nothing pending, nothing appended
        buffer.finish();
        assert!(buffer.next_line().is_none());
    }

    #[test]
    fn test_invalid_utf8() {
        let mut buffer = CircularLineBuffer::with_capacity(64);

        buffer.extend(&[0xff, 0xfe, b'\n']);
        assert!(matches!(buffer.next_line(), Some(Err(LlmError::Stream(_)))));
    }
}
