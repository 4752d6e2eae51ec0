//! Shared helpers for fabric-desk integration tests.

#![allow(dead_code)]

use fabric_desk::events::{self, AppEvent, EventReceiver};
use fabric_desk::history::HistoryBuffer;
use fabric_desk::relay::StreamRelay;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Address nothing listens on.
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:9";

/// SSE body with one `data:` frame per record.
pub fn sse_body(records: &[serde_json::Value]) -> String {
    records
        .iter()
        .map(|record| format!("data: {}\n\n", record))
        .collect()
}

pub fn content(text: &str) -> serde_json::Value {
    serde_json::json!({"type": "content", "content": text, "format": "markdown"})
}

pub fn complete() -> serde_json::Value {
    serde_json::json!({"type": "complete", "content": ""})
}

/// A relay over a fresh history buffer, plus its event receiver.
pub fn relay_for(base_url: &str) -> (StreamRelay, EventReceiver) {
    let (tx, rx) = events::channel();
    let relay = StreamRelay::new(base_url, Arc::new(HistoryBuffer::new()), tx);
    (relay, rx)
}

/// Everything currently queued on the receiver.
pub fn drain(rx: &mut EventReceiver) -> Vec<AppEvent> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        out.push(event);
    }
    out
}

/// Serve one chunked SSE response that carries `body` and then drops the
/// connection without the terminating chunk. Returns the base URL.
pub async fn truncated_stream_server(body: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 16 * 1024];
        // Request line, headers and the small JSON body arrive together
        let _ = socket.read(&mut buf).await;

        let head = "HTTP/1.1 200 OK\r\n\
                    content-type: text/event-stream\r\n\
                    transfer-encoding: chunked\r\n\r\n";
        let chunk = format!("{:x}\r\n{}\r\n", body.len(), body);
        let _ = socket.write_all(head.as_bytes()).await;
        let _ = socket.write_all(chunk.as_bytes()).await;
        let _ = socket.flush().await;
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        // Dropping the socket ends the response mid-stream
    });

    format!("http://{}", addr)
}
