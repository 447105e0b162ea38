//! Loopback HTTP stub for tests.
//!
//! Serves canned JSON responses keyed by request path (query included) so the
//! client can be exercised without reaching the real API.

use crate::github::{ClientConfig, GitHubClient};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A canned response.
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl StubResponse {
    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    /// Hold the response back for `delay` before answering.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A running stub server. Unknown paths answer 404.
pub struct StubServer {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    pub async fn start(routes: Vec<(&str, StubResponse)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub server");
        let addr = listener.local_addr().expect("stub server address");

        let routes: Arc<HashMap<String, StubResponse>> = Arc::new(
            routes
                .into_iter()
                .map(|(path, response)| (path.to_string(), response))
                .collect(),
        );
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);

        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                let routes = Arc::clone(&routes);
                let log = Arc::clone(&log);
                tokio::spawn(serve(socket, routes, log));
            }
        });

        Self {
            base_url: format!("http://{}/users", addr),
            requests,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Paths requested so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("request log").clone()
    }
}

async fn serve(
    mut socket: TcpStream,
    routes: Arc<HashMap<String, StubResponse>>,
    log: Arc<Mutex<Vec<String>>>,
) {
    let mut head = Vec::new();
    let mut chunk = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&chunk[..n]),
        }
    }

    let head = String::from_utf8_lossy(&head);
    let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();
    log.lock().expect("request log").push(path.clone());

    let response = routes
        .get(&path)
        .cloned()
        .unwrap_or_else(|| StubResponse::json(404, r#"{"message":"Not Found"}"#));

    if !response.delay.is_zero() {
        tokio::time::sleep(response.delay).await;
    }

    let raw = format!(
        "HTTP/1.1 {} {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        response.status,
        reason(response.status),
        response.body.len(),
        response.body
    );
    let _ = socket.write_all(raw.as_bytes()).await;
    let _ = socket.shutdown().await;
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// A client pointed at the stub, bypassing any environment proxy.
pub fn test_client(server: &StubServer, timeout: Duration) -> GitHubClient {
    GitHubClient::new(ClientConfig {
        base_url: server.base_url().to_string(),
        timeout,
        use_system_proxy: false,
        ..ClientConfig::default()
    })
    .expect("build test client")
}

pub fn profile_body(login: &str) -> String {
    serde_json::json!({
        "login": login,
        "id": 1,
        "name": null,
        "avatar_url": format!("https://avatars.example.test/{}", login),
        "html_url": format!("https://github.com/{}", login),
        "bio": null,
        "public_repos": 3,
        "followers": 42,
        "following": 0
    })
    .to_string()
}

pub fn repo_body(id: u64, name: &str, stars: u64, language: Option<&str>) -> String {
    serde_json::json!({
        "id": id,
        "name": name,
        "html_url": format!("https://github.com/test/{}", name),
        "stargazers_count": stars,
        "forks_count": 0,
        "language": language,
        "fork": false
    })
    .to_string()
}

pub fn repos_body(repos: &[String]) -> String {
    format!("[{}]", repos.join(","))
}
