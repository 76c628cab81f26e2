//! Sentinel-terminated framing over a line stream.
//!
//! Protocol: lines accumulate until a line exactly equal to `end of transmission\n`
//! is read. That line is discarded and everything before it is one payload. Blank
//! lines and JSON punctuation are ordinary payload; nothing but an exact match ends a
//! frame, so the sentinel line must never occur inside a payload.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{trace, warn};

use crate::domain::errors::TransportError;

/// Reserved terminator token.
pub const SENTINEL: &str = "end of transmission";

const SENTINEL_LINE: &str = "end of transmission\n";

/// Wrap a payload in a frame.
///
/// A trailing newline is added when the payload lacks one, since the sentinel must
/// start on its own line. Payloads made of newline-terminated lines survive
/// `frame` followed by [`Framer::read_frame`] unchanged.
pub fn frame(payload: &str) -> String {
    let mut framed = String::with_capacity(payload.len() + SENTINEL_LINE.len() + 1);
    framed.push_str(payload);
    if !payload.is_empty() && !payload.ends_with('\n') {
        framed.push('\n');
    }
    framed.push_str(SENTINEL_LINE);
    framed
}

/// Reads sentinel-delimited frames from a buffered reader.
///
/// The reader is kept between frames so bytes buffered past one sentinel belong to
/// the next frame.
#[derive(Debug)]
pub struct Framer<R> {
    reader: R,
    strict: bool,
}

impl<R> Framer<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    /// Create a lenient framer: EOF after a partial payload returns that payload.
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            strict: false,
        }
    }

    /// Fail with [`TransportError::IncompleteFrame`] on EOF after a partial payload.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Read the next frame.
    ///
    /// Returns [`TransportError::ChannelClosed`] if the stream is already at EOF.
    /// Not cancel-safe: dropping the future mid-frame loses the lines read so far.
    pub async fn read_frame(&mut self) -> Result<String, TransportError> {
        let mut payload = String::new();
        let mut line = String::new();
        let mut received_any = false;

        loop {
            line.clear();
            let read = self.reader.read_line(&mut line).await?;

            if read == 0 {
                if !received_any {
                    return Err(TransportError::ChannelClosed);
                }
                if self.strict {
                    return Err(TransportError::IncompleteFrame {
                        received_bytes: payload.len(),
                    });
                }
                warn!(
                    received_bytes = payload.len(),
                    "stream closed before sentinel, returning partial payload"
                );
                return Ok(payload);
            }

            received_any = true;

            if line == SENTINEL_LINE {
                trace!(bytes = payload.len(), "frame complete");
                return Ok(payload);
            }

            payload.push_str(&line);
        }
    }
}
