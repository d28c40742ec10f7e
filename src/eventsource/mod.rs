use async_stream::try_stream;
use futures::{Stream, StreamExt};
use memchr::memchr;
use reqwest::Response;
use std::pin::Pin;

const LINE_TERMINATOR: u8 = b'\n';
const DATA_PREFIX: &str = "data: ";
const DONE_SENTINEL: &str = "[DONE]";

/// Classification of a single server-sent-event line.
///
/// Only `data: ` lines carry anything. Comments (`: keepalive`), `event:`,
/// `id:` and `retry:` lines all fall through to [`SseLine::Ignored`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SseLine<'a> {
    /// Payload of a `data: ` line, prefix stripped
    Data(&'a str),
    /// `data: [DONE]`, the server is finished
    Done,
    Ignored,
}

impl<'a> SseLine<'a> {
    /// Parses one line. Surrounding whitespace (including `\r`) is ignored.
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Ignored;
        }

        match line.strip_prefix(DATA_PREFIX) {
            Some(payload) if payload.trim() == DONE_SENTINEL => Self::Done,
            Some(payload) => Self::Data(payload.trim()),
            None => Self::Ignored,
        }
    }
}

/// Accumulates raw bytes and hands out complete lines.
///
/// Bytes are kept until a terminator arrives, so a multi-byte character split
/// across two network reads is decoded intact.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buffer: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(1024),
        }
    }

    pub fn push(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Next complete line without its terminator, if one is buffered.
    pub fn next_line(&mut self) -> Option<String> {
        let end = memchr(LINE_TERMINATOR, &self.buffer)?;
        let line = String::from_utf8_lossy(&self.buffer[..end]).into_owned();
        self.buffer.drain(..=end);
        Some(line)
    }

    /// Whatever is left once the byte stream has ended.
    pub fn finish(self) -> Option<String> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(String::from_utf8_lossy(&self.buffer).into_owned())
        }
    }
}

/// Extension trait for reading a Response body line by line as it arrives.
pub trait EventSourceExt {
    /// Converts the response body into a Stream of lines.
    ///
    /// The final unterminated line, if any, is yielded when the body ends.
    fn lines(self) -> Pin<Box<dyn Stream<Item = Result<String, reqwest::Error>> + Send>>;
}

impl EventSourceExt for Response {
    fn lines(self) -> Pin<Box<dyn Stream<Item = Result<String, reqwest::Error>> + Send>> {
        Box::pin(try_stream! {
            let mut stream = self.bytes_stream();
            let mut buffer = LineBuffer::new();

            while let Some(chunk) = stream.next().await {
                buffer.push(&chunk?);
                while let Some(line) = buffer.next_line() {
                    yield line;
                }
            }

            if let Some(line) = buffer.finish() {
                yield line;
            }
        })
    }
}
