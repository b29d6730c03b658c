use futures::{Stream, StreamExt};
use std::pin::Pin;

use super::buffering::CircularLineBuffer;
use crate::error::{LlmError, Result};

/// Strategy pattern for parsing different SSE payload types
pub trait SseLineParser: Send {
    type Item: Send;

    /// Parse the payload of a `data:` line. `Ok(None)` drops the line.
    fn parse_data_line(&self, data: &str) -> Result<Option<Self::Item>>;

    /// Check if this payload signals end of stream
    fn is_done_marker(&self, data: &str) -> bool {
        data == "[DONE]"
    }
}

/// Payload of a `data:` line, with the optional single leading space removed
fn data_field(line: &str) -> Option<&str> {
    line.strip_prefix("data:")
        .map(|data| data.strip_prefix(' ').unwrap_or(data))
}

/// Generic SSE stream parser over any byte stream.
///
/// Blank lines, comments, non-data fields and empty `data:` lines are
/// ignored. The stream ends at the parser's done marker or when the byte
/// stream closes; a transport error is yielded once and ends the stream.
pub fn parse_sse_stream<S, B, E, P>(
    byte_stream: S,
    parser: P,
) -> Pin<Box<dyn Stream<Item = Result<P::Item>> + Send>>
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<LlmError> + Send + 'static,
    P: SseLineParser + 'static,
    P::Item: 'static,
{
    Box::pin(async_stream::stream! {
        let mut byte_chunks = Box::pin(byte_stream);
        let mut buffer = CircularLineBuffer::with_capacity(4096);

        loop {
            let closed = match byte_chunks.next().await {
                Some(Ok(bytes)) => {
                    buffer.extend(bytes.as_ref());
                    false
                }
                Some(Err(e)) => {
                    let e: LlmError = e.into();
                    yield Err(e);
                    return;
                }
                None => {
                    buffer.finish();
                    true
                }
            };

            while let Some(line_result) = buffer.next_line() {
                let line = match line_result {
                    Ok(line) => line,
                    Err(e) => {
                        yield Err(e);
                        continue;
                    }
                };

                let data = match data_field(&line) {
                    Some(data) => data,
                    None => continue,
                };

                // events with empty data are not dispatched (heartbeats)
                if data.is_empty() {
                    continue;
                }

                if parser.is_done_marker(data) {
                    tracing::debug!("SSE done marker received");
                    return;
                }

                match parser.parse_data_line(data) {
                    Ok(Some(item)) => {
                        yield Ok(item);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        yield Err(e);
                    }
                }
            }

            if closed {
                return;
            }
        }
    })
}
