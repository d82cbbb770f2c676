//! Line-based codec for tokio.
//!
//! Splits the byte stream on `\n`, strips an optional `\r`, and skips empty
//! lines. A bad line (too long, not UTF-8, illegal control character) is
//! yielded as an `Err` item so the stream keeps going; only I/O failures
//! surface as the decoder's own error.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{self, ProtocolError};

/// Default maximum line length in bytes, terminator included.
pub const MAX_IRC_LINE_LEN: usize = 512;

/// Control characters that may legally appear inside a line.
///
/// Covers the mIRC formatting codes and the CTCP delimiter.
fn is_format_code(ch: char) -> bool {
    matches!(
        ch,
        '\x01' | '\x02' | '\x03' | '\x04' | '\x0f' | '\x11' | '\x16' | '\x1d' | '\x1e' | '\x1f'
    )
}

/// Check whether `ch` must never appear in a line.
///
/// ```
/// use microirc_proto::line::is_illegal_control_char;
///
/// assert!(is_illegal_control_char('\x07'));
/// assert!(!is_illegal_control_char('\x02'));
/// assert!(!is_illegal_control_char(' '));
/// ```
#[inline]
pub fn is_illegal_control_char(ch: char) -> bool {
    if ch == '\x07' {
        return true;
    }
    ch.is_control() && !matches!(ch, '\r' | '\n' | '\0' | '\t') && !is_format_code(ch)
}

/// One decoded line, or the reason it was rejected.
pub type LineResult = Result<String, ProtocolError>;

/// Line-based codec that handles newline-terminated messages.
///
/// By default, lines are limited to 512 bytes (IRC standard).
#[derive(Debug)]
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    /// Maximum line length
    max_len: usize,
    /// Dropping the rest of an over-long line until its newline arrives
    discarding: bool,
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl LineCodec {
    /// Create a new codec with the default 512 byte limit.
    pub fn new() -> Self {
        Self::with_max_len(MAX_IRC_LINE_LEN)
    }

    /// Create a new codec with custom max line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
            discarding: false,
        }
    }

    /// The configured maximum line length.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Validate that a string contains no illegal control characters.
    fn validate_line(s: &str) -> error::Result<()> {
        match s.chars().find(|&ch| is_illegal_control_char(ch)) {
            Some(ch) => Err(ProtocolError::IllegalControlChar(ch)),
            None => Ok(()),
        }
    }

    /// Turn one raw line (terminator included) into a checked string.
    fn finish_line(&self, raw: &[u8]) -> LineResult {
        if raw.len() > self.max_len {
            return Err(ProtocolError::MessageTooLong {
                actual: raw.len(),
                limit: self.max_len,
            });
        }

        let body = raw.strip_suffix(b"\n").unwrap_or(raw);
        let body = body.strip_suffix(b"\r").unwrap_or(body);

        let data = std::str::from_utf8(body).map_err(|e| ProtocolError::InvalidUtf8 {
            raw_line: body.to_vec(),
            byte_pos: e.valid_up_to(),
            details: e.to_string(),
            command_hint: error::extract_command_hint(body),
        })?;

        Self::validate_line(data)?;
        Ok(data.to_owned())
    }
}

impl Decoder for LineCodec {
    type Item = LineResult;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<LineResult>> {
        loop {
            // Look for newline starting from where we left off
            let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') else {
                // No complete line yet - remember where we stopped
                self.next_index = src.len();

                if self.discarding {
                    src.clear();
                    self.next_index = 0;
                } else if src.len() > self.max_len {
                    let actual = src.len();
                    src.clear();
                    self.next_index = 0;
                    self.discarding = true;
                    return Ok(Some(Err(ProtocolError::MessageTooLong {
                        actual,
                        limit: self.max_len,
                    })));
                }

                return Ok(None);
            };

            let line = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;

            if self.discarding {
                self.discarding = false;
                continue;
            }

            if line.iter().all(|b| matches!(b, b'\r' | b'\n')) {
                continue;
            }

            return Ok(Some(self.finish_line(&line)));
        }
    }
}

impl Encoder<String> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, msg: String, dst: &mut BytesMut) -> error::Result<()> {
        dst.extend_from_slice(msg.as_bytes());
        Ok(())
    }
}
