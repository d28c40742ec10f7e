#![allow(dead_code)]

use openrouter_client::{ClientConfig, OpenRouterClient};
use std::future::Future;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

pub const API_KEY: &str = "sk-or-test";

/// A request as it arrived at the stub server.
#[derive(Debug)]
pub struct CapturedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body should be JSON")
    }
}

/// Accepts a single connection, reads the request, and hands both to `handler`.
pub async fn spawn_server<F, Fut, T>(handler: F) -> (String, JoinHandle<T>)
where
    F: FnOnce(TcpStream, CapturedRequest) -> Fut + Send + 'static,
    Fut: Future<Output = T> + Send,
    T: Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("local addr should resolve");

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("client should connect");
        let request = read_http_request(&mut stream)
            .await
            .expect("request should be readable");
        handler(stream, request).await
    });

    (format!("http://{addr}/api/v1"), handle)
}

/// Serves one canned response and returns the captured request.
pub async fn serve_once(status: u16, body: &str) -> (String, JoinHandle<CapturedRequest>) {
    let body = body.to_string();
    spawn_server(move |mut stream, request| async move {
        write_response(&mut stream, status, "application/json", &body).await;
        request
    })
    .await
}

pub fn client(base_url: &str) -> OpenRouterClient {
    OpenRouterClient::new(ClientConfig::new(API_KEY).with_base_url(base_url))
}

pub async fn write_response(stream: &mut TcpStream, status: u16, content_type: &str, body: &str) {
    let head = format!(
        "HTTP/1.1 {status} Stub\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    stream.write_all(head.as_bytes()).await.expect("write head");
    stream.write_all(body.as_bytes()).await.expect("write body");
    stream.flush().await.expect("flush");
}

/// Starts an event-stream response. Without a length the body runs until the socket closes.
pub async fn write_stream_head(stream: &mut TcpStream, status: u16, content_length: Option<usize>) {
    let length = content_length
        .map(|len| format!("Content-Length: {len}\r\n"))
        .unwrap_or_default();
    let head = format!(
        "HTTP/1.1 {status} Stub\r\nContent-Type: text/event-stream\r\n{length}Connection: close\r\n\r\n"
    );
    stream.write_all(head.as_bytes()).await.expect("write head");
    stream.flush().await.expect("flush");
}

pub async fn write_raw(stream: &mut TcpStream, data: impl AsRef<[u8]>) {
    stream.write_all(data.as_ref()).await.expect("write data");
    stream.flush().await.expect("flush");
}

/// A `data:` line carrying one content delta.
pub fn delta_line(content: &str) -> String {
    let chunk = serde_json::json!({
        "id": "gen-1",
        "provider": "OpenAI",
        "model": "openai/gpt-4o",
        "object": "chat.completion.chunk",
        "created": 1735689600,
        "choices": [{"index": 0, "delta": {"role": "assistant", "content": content}, "finish_reason": null}]
    });
    format!("data: {chunk}\n")
}

/// Sends SSE keepalive comments until the peer closes the connection.
pub async fn wait_for_close(stream: &mut TcpStream) {
    let mut buffer = [0_u8; 1024];
    loop {
        tokio::select! {
            read = stream.read(&mut buffer) => match read {
                Ok(0) | Err(_) => return,
                Ok(_) => continue,
            },
            () = tokio::time::sleep(Duration::from_millis(50)) => {
                let keepalive = stream.write_all(b": OPENROUTER PROCESSING\n").await;
                if keepalive.is_err() || stream.flush().await.is_err() {
                    return;
                }
            }
        }
    }
}

async fn read_http_request(stream: &mut TcpStream) -> Result<CapturedRequest, String> {
    let mut buffer = Vec::new();
    let mut header_end = None;
    while header_end.is_none() {
        let mut chunk = [0_u8; 1024];
        let read = stream
            .read(&mut chunk)
            .await
            .map_err(|err| err.to_string())?;
        if read == 0 {
            return Err("Unexpected EOF while reading HTTP headers".to_string());
        }
        buffer.extend_from_slice(&chunk[..read]);
        header_end = buffer
            .windows(4)
            .position(|window| window == b"\r\n\r\n")
            .map(|index| index + 4);
    }

    let header_end = header_end.expect("header end should exist");
    let header_text = std::str::from_utf8(&buffer[..header_end]).map_err(|err| err.to_string())?;
    let mut lines = header_text.split("\r\n").filter(|line| !line.is_empty());
    let request_line = lines
        .next()
        .ok_or_else(|| "Missing HTTP request line".to_string())?
        .to_string();

    let mut headers = Vec::new();
    let mut content_length = 0_usize;
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim().to_string();
        if name.eq_ignore_ascii_case("content-length") {
            content_length = value.parse::<usize>().map_err(|err| err.to_string())?;
        }
        headers.push((name.to_string(), value));
    }

    let mut body = buffer[header_end..].to_vec();
    while body.len() < content_length {
        let mut chunk = vec![0_u8; content_length - body.len()];
        let read = stream
            .read(&mut chunk)
            .await
            .map_err(|err| err.to_string())?;
        if read == 0 {
            return Err("Unexpected EOF while reading HTTP body".to_string());
        }
        body.extend_from_slice(&chunk[..read]);
    }

    Ok(CapturedRequest {
        request_line,
        headers,
        body,
    })
}
