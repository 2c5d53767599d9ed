//! Printing streamed answers as they arrive.

use std::io::Write;

use futures::{Stream, StreamExt};
use tracing::warn;

use crate::core::{LlmError, TextFragment};

/// What happened while a stream was printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamOutcome {
    /// Fragments written to the output.
    pub fragments: usize,
    /// The stream or the output failed before the end was reached.
    pub interrupted: bool,
}

/// Write every fragment to `out` as soon as it arrives.
///
/// The first fault, from the stream or from `out`, stops consumption. A
/// stream fault is reported once as `Error during streaming: ..` on `out`;
/// neither kind is returned to the caller.
pub async fn print_stream<S, W>(stream: S, out: &mut W) -> StreamOutcome
where
    S: Stream<Item = Result<TextFragment, LlmError>>,
    W: Write + ?Sized,
{
    let mut stream = std::pin::pin!(stream);
    let mut outcome = StreamOutcome {
        fragments: 0,
        interrupted: false,
    };

    while let Some(item) = stream.next().await {
        match item {
            Ok(fragment) => {
                if let Err(e) = out
                    .write_all(fragment.text.as_bytes())
                    .and_then(|_| out.flush())
                {
                    warn!(error = %e, "Failed to write streamed fragment");
                    outcome.interrupted = true;
                    break;
                }
                outcome.fragments += 1;
            }
            Err(e) => {
                warn!(error = %e, fragments = outcome.fragments, "Streaming interrupted");
                let diagnostic = format!("\nError during streaming: {e}\n");
                // Best effort, the stream is abandoned either way.
                let _ = out
                    .write_all(diagnostic.as_bytes())
                    .and_then(|_| out.flush());
                outcome.interrupted = true;
                break;
            }
        }
    }

    outcome
}
