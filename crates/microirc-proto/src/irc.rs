//! IRC message codec for tokio.
//!
//! This module provides a codec that encodes and decodes IRC [`Message`] types
//! using the tokio codec framework.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{self, ProtocolError};
use crate::line::{is_illegal_control_char, LineCodec};
use crate::message::Message;

/// One decoded message, or the reason its line was rejected.
pub type MessageResult = Result<Message, ProtocolError>;

/// Tokio codec for encoding/decoding IRC messages.
///
/// Wraps [`LineCodec`] and parses lines into [`Message`] types. Lines that
/// fail to parse are yielded as `Err` items; the stream only ends on EOF or
/// an I/O error.
#[derive(Debug, Default)]
pub struct IrcCodec {
    inner: LineCodec,
}

impl IrcCodec {
    /// Create a new codec with the default line limit.
    pub fn new() -> Self {
        Self {
            inner: LineCodec::new(),
        }
    }

    /// Create a new codec with custom max line length.
    ///
    /// # Arguments
    /// * `max_len` - Maximum line length in bytes
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            inner: LineCodec::with_max_len(max_len),
        }
    }

    /// Sanitize outgoing message data.
    ///
    /// - Truncates at first line ending
    /// - Rejects illegal control characters
    pub fn sanitize(mut data: String) -> error::Result<String> {
        if let Some(pos) = data.find(['\r', '\n']) {
            data.truncate(pos);
        }

        if let Some(ch) = data.chars().find(|&ch| is_illegal_control_char(ch)) {
            return Err(ProtocolError::IllegalControlChar(ch));
        }

        Ok(data)
    }
}

impl Decoder for IrcCodec {
    type Item = MessageResult;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<MessageResult>> {
        let Some(line) = self.inner.decode(src)? else {
            return Ok(None);
        };

        Ok(Some(line.and_then(|line| {
            line.parse::<Message>()
                .map_err(|cause| ProtocolError::InvalidMessage {
                    string: line,
                    cause,
                })
        })))
    }
}

impl Encoder<Message> for IrcCodec {
    type Error = ProtocolError;

    /// Trailing text that would push the line past the limit is cut off.
    fn encode(&mut self, mut msg: Message, dst: &mut BytesMut) -> error::Result<()> {
        msg.truncate_to(self.inner.max_len());
        let mut line = Self::sanitize(msg.to_string())?;
        line.push_str("\r\n");
        self.inner.encode(line, dst)
    }
}
