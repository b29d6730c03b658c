//! The two demonstration requests and the operator-facing run loop.
//!
//! Each scenario returns its own `Result`, so a failure in the regular
//! request never prevents the streaming request from being attempted.

use std::io::{self, Write};

use traceforge_llm::{
    consume, consume_stream, ChatClient, ChatRequest, FragmentStream, Message, Result,
};

pub const DEMO_MODEL: &str = "gpt-3.5-turbo";
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";
pub const REGULAR_PROMPT: &str = "Explain quantum computing in one sentence.";
pub const STREAMING_PROMPT: &str = "Count from 1 to 5 slowly.";
pub const TRACES_HINT: &str = "📊 Check .ai-tests/traces/ for captured traces";

pub fn regular_request() -> ChatRequest {
    ChatRequest::build(
        DEMO_MODEL,
        vec![Message::system(SYSTEM_PROMPT), Message::human(REGULAR_PROMPT)],
        0.7,
        100,
        false,
    )
}

pub fn streaming_request() -> ChatRequest {
    ChatRequest::build(
        DEMO_MODEL,
        vec![Message::system(SYSTEM_PROMPT), Message::human(STREAMING_PROMPT)],
        0.7,
        50,
        true,
    )
}

/// Test 1: single-shot completion
pub async fn run_regular(client: &dyn ChatClient, request: &ChatRequest) -> Result<String> {
    let completion = client.submit(request).await?.into_completion()?;
    consume(&completion)
}

/// Submit the streaming request without reading any fragment yet
pub async fn open_streaming(
    client: &dyn ChatClient,
    request: &ChatRequest,
) -> Result<FragmentStream> {
    client.submit(request).await?.into_fragments()
}

/// Test 2: streaming completion, surfacing each delta through `on_delta`
pub async fn run_streaming<F>(
    client: &dyn ChatClient,
    request: &ChatRequest,
    on_delta: F,
) -> Result<String>
where
    F: FnMut(&str),
{
    let fragments = open_streaming(client, request).await?;
    consume_stream(fragments, on_delta).await
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
}

impl RunSummary {
    fn record<T>(&mut self, result: &Result<T>) {
        match result {
            Ok(_) => self.passed += 1,
            Err(_) => self.failed += 1,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Run both scenarios against `client`, writing status lines to `out`
pub async fn run_demo<W: Write>(
    client: &dyn ChatClient,
    proxy_url: &str,
    out: &mut W,
) -> io::Result<RunSummary> {
    let mut summary = RunSummary::default();

    writeln!(out, "🤖 TraceForge Demo App (Rust)")?;
    writeln!(out, "📡 Using proxy: {}", proxy_url)?;

    writeln!(out, "\n--- Test 1: Regular Chat Completion ---\n")?;
    let result = run_regular(client, &regular_request()).await;
    summary.record(&result);
    match result {
        Ok(text) => {
            writeln!(out, "Response: {}", text)?;
            writeln!(out, "✅ Regular request successful!")?;
        }
        Err(e) => {
            tracing::warn!("regular request failed: {}", e);
            writeln!(out, "❌ Error: {}", e)?;
        }
    }

    writeln!(out, "\n--- Test 2: Streaming Chat Completion ---\n")?;
    let result = match open_streaming(client, &streaming_request()).await {
        Ok(fragments) => {
            write!(out, "Response: ")?;
            out.flush()?;

            let mut write_error = None;
            let result = consume_stream(fragments, |delta| {
                if write_error.is_none() {
                    if let Err(e) = out.write_all(delta.as_bytes()).and_then(|_| out.flush()) {
                        write_error = Some(e);
                    }
                }
            })
            .await;
            if let Some(e) = write_error {
                return Err(e);
            }
            result
        }
        Err(e) => Err(e),
    };

    summary.record(&result);
    match result {
        Ok(_) => writeln!(out, "\n✅ Streaming request successful!")?,
        Err(e) => {
            tracing::warn!("streaming request failed: {}", e);
            writeln!(out, "\n❌ Error: {}", e)?;
        }
    }

    writeln!(out, "\n{}", TRACES_HINT)?;

    Ok(summary)
}
