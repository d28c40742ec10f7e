use super::llm::FragmentStream;
use super::types::ChatCompletionChunk;
use crate::core::OpenRouterError;
use crate::eventsource::{EventSourceExt, SseLine};
use futures::{Stream, StreamExt};
use log::{debug, warn};
use reqwest::Response;
use std::fmt::Display;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

const CHANNEL_CAPACITY: usize = 32;

/// Content fragment carried by one SSE line, if any.
///
/// Undecodable payloads and chunks without content are skipped, not fatal.
pub fn extract_fragment(line: &str) -> Option<String> {
    match SseLine::parse(line) {
        SseLine::Data(payload) => match serde_json::from_str::<ChatCompletionChunk>(payload) {
            Ok(chunk) => chunk.content().map(str::to_owned),
            Err(e) => {
                debug!("[Stream] skipping undecodable payload: {e}");
                None
            }
        },
        SseLine::Done => {
            debug!("[Stream] server sent [DONE]");
            None
        }
        SseLine::Ignored => None,
    }
}

/// Hands the response body to a background task and returns the consumer side.
///
/// Dropping the returned stream stops the task, which drops the body and
/// releases the connection.
pub fn spawn_fragment_stream(response: Response) -> FragmentStream {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    tokio::spawn(pump_fragments(response.lines(), tx));
    ReceiverStream::new(rx).boxed()
}

/// A stream that ends immediately.
pub fn empty_stream() -> FragmentStream {
    futures::stream::empty().boxed()
}

/// Reads lines until the source ends, fails, or the consumer goes away.
pub async fn pump_fragments<S, E>(mut lines: S, tx: mpsc::Sender<String>)
where
    S: Stream<Item = Result<String, E>> + Send + Unpin,
    E: Display + Send,
{
    let mut yielded = 0usize;
    loop {
        let next = tokio::select! {
            () = tx.closed() => {
                debug!("[Stream] consumer dropped after {yielded} fragments, closing");
                return;
            }
            next = lines.next() => next,
        };

        match next {
            None => {
                debug!("[Stream] finished after {yielded} fragments");
                return;
            }
            Some(Err(e)) => {
                let failure = OpenRouterError::StreamingFailure(e.to_string());
                warn!("[Stream] ending after {yielded} fragments: {failure}");
                return;
            }
            Some(Ok(line)) => {
                if let Some(fragment) = extract_fragment(&line) {
                    if tx.send(fragment).await.is_err() {
                        return;
                    }
                    yielded += 1;
                }
            }
        }
    }
}
