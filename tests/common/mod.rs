//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Start a mock backend on an ephemeral port that answers every request
/// with 200 and the given body. Returns the address it listens on.
pub async fn start_mock_backend(body: &'static str) -> SocketAddr {
    serve(move |_target| (200, body.to_string())).await
}

/// Start a mock backend that always answers with the given status.
#[allow(dead_code)]
pub async fn start_failing_backend(status: u16) -> SocketAddr {
    serve(move |_target| (status, String::new())).await
}

/// Start a mock backend that echoes the request target (path + query) back
/// as the response body.
#[allow(dead_code)]
pub async fn start_echo_backend() -> SocketAddr {
    serve(|target| (200, target)).await
}

/// Reserve an address nothing listens on.
pub async fn dead_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

async fn serve<F>(respond: F) -> SocketAddr
where
    F: Fn(String) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let respond = Arc::new(respond);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let respond = respond.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]);
                let target = request
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or("/")
                    .to_string();

                let (status, body) = respond(target);
                let status_text = match status {
                    200 => "200 OK",
                    500 => "500 Internal Server Error",
                    503 => "503 Service Unavailable",
                    _ => "200 OK",
                };
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}
