//! Consumers for the two reply modes.
//!
//! Policies for degenerate replies:
//! - a completion with no choices is a shape fault, not empty text;
//! - a choice whose content is `null` yields `""`;
//! - a stream that closes without any fragment yields `""`;
//! - the first failed fragment aborts the stream and drops the partial text.

use futures::{Stream, StreamExt};

use crate::error::{LlmError, Result};
use crate::openai::ChatCompletion;
use crate::streaming::ChatStreamChunk;

/// Extract the generated text of the first choice
pub fn consume(completion: &ChatCompletion) -> Result<String> {
    let choice = completion
        .choices
        .first()
        .ok_or_else(|| LlmError::Shape("completion has no choices".to_string()))?;

    Ok(choice.message.content.clone().unwrap_or_default())
}

/// Drain a fragment stream in arrival order.
///
/// Every present delta is handed to `on_delta` before the next fragment is
/// requested, then appended to the returned text.
pub async fn consume_stream<S, F>(fragments: S, mut on_delta: F) -> Result<String>
where
    S: Stream<Item = Result<ChatStreamChunk>>,
    F: FnMut(&str),
{
    let mut fragments = std::pin::pin!(fragments);
    let mut accumulated = String::new();
    let mut received = 0usize;

    while let Some(fragment) = fragments.next().await {
        let fragment = fragment.inspect_err(|e| {
            tracing::warn!(received, "stream aborted: {}", e);
        })?;
        received += 1;

        if let Some(delta) = fragment.content() {
            on_delta(delta);
            accumulated.push_str(delta);
        }
    }

    tracing::debug!(received, chars = accumulated.len(), "stream exhausted");
    Ok(accumulated)
}
