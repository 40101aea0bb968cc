// src/source/testing.rs
// =============================================================================
// Helpers for tests that go through the real HTTP sources.
//
// - TestServer: a tiny HTTP/1.1 server on 127.0.0.1 that answers canned
//   responses by request target and records every request it sees
// - CapturedLogs: a tracing subscriber that writes into a buffer so tests
//   can assert on warnings
//
// The server handles one connection at a time and closes it after each
// response. That is enough here because the walker never has more than one
// request in flight.
// =============================================================================

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use reqwest::StatusCode;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

// One request as seen by the server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Path and query, exactly as sent (e.g. "/api/v4/...?path=src")
    pub target: String,
    /// Header names are lowercased
    pub headers: HashMap<String, String>,
}

#[derive(Debug, Clone)]
struct CannedResponse {
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
}

pub struct TestServer {
    pub base_url: String,
    routes: HashMap<String, CannedResponse>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl TestServer {
    pub fn new() -> Self {
        Self {
            base_url: String::new(),
            routes: HashMap::new(),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    // Registers a JSON response for a request target
    pub fn json(mut self, target: &str, status: u16, body: serde_json::Value) -> Self {
        self.routes.insert(
            target.to_string(),
            CannedResponse {
                status,
                content_type: "application/json",
                body: body.to_string().into_bytes(),
            },
        );
        self
    }

    // Registers a plain-text response for a request target
    pub fn text(mut self, target: &str, status: u16, body: &str) -> Self {
        self.routes.insert(
            target.to_string(),
            CannedResponse {
                status,
                content_type: "text/plain",
                body: body.as_bytes().to_vec(),
            },
        );
        self
    }

    // Binds a local port and starts answering in a background task.
    // Unknown targets get a GitLab-style 404 JSON body.
    pub async fn start(mut self) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        self.base_url = format!("http://{}", listener.local_addr().unwrap());

        let routes = self.routes.clone();
        let requests = Arc::clone(&self.requests);

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                serve_one(stream, &routes, &requests).await;
            }
        });

        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn targets(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.target).collect()
    }
}

async fn serve_one(
    mut stream: TcpStream,
    routes: &HashMap<String, CannedResponse>,
    requests: &Mutex<Vec<RecordedRequest>>,
) {
    // GET requests have no body, so the head is all we need
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    let head = String::from_utf8_lossy(&buf);
    let mut lines = head.split("\r\n");
    let target = lines
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or_default()
        .to_string();
    let headers = lines
        .take_while(|line| !line.is_empty())
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
        .collect();

    requests.lock().unwrap().push(RecordedRequest {
        target: target.clone(),
        headers,
    });

    let response = routes.get(&target).cloned().unwrap_or(CannedResponse {
        status: 404,
        content_type: "application/json",
        body: br#"{"message":"404 Not Found"}"#.to_vec(),
    });

    let reason = StatusCode::from_u16(response.status)
        .ok()
        .and_then(|status| status.canonical_reason())
        .unwrap_or("Unknown");
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        response.status,
        reason,
        response.content_type,
        response.body.len()
    );

    let _ = stream.write_all(head.as_bytes()).await;
    let _ = stream.write_all(&response.body).await;
    let _ = stream.shutdown().await;
}

// Collects formatted tracing output for the current thread.
//
// Usage:
//   let logs = CapturedLogs::default();
//   let _guard = logs.install();
//   ... code that logs ...
//   assert!(logs.contents().contains("..."));
#[derive(Debug, Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::WARN)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
