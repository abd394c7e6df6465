//! Local HTTP server answering canned JSON for client tests
//!
//! Each test starts its own server on an ephemeral port. Unrouted paths get a
//! 404, and every request path is recorded so tests can count network hits.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use reqwest::Client;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use super::PokemonClient;
use crate::cache::CacheConfig;

/// Path prefix every client URL starts with
const API_PREFIX: &str = "/api/v2";

#[derive(Debug, Default)]
struct Routes {
    responses: HashMap<String, (u16, String)>,
    hits: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct StubServer {
    port: u16,
    routes: Arc<Mutex<Routes>>,
}

impl StubServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub server");
        let port = listener
            .local_addr()
            .expect("Stub server has no address")
            .port();
        let routes = Arc::new(Mutex::new(Routes::default()));

        let shared = Arc::clone(&routes);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(respond(stream, Arc::clone(&shared)));
            }
        });

        Self { port, routes }
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}{}", self.port, API_PREFIX)
    }

    /// A client pointed at this server that ignores proxy settings
    pub fn client(&self) -> PokemonClient {
        let http_client = Client::builder()
            .no_proxy()
            .build()
            .expect("Failed to build HTTP client");
        PokemonClient::with_http_client(http_client, self.base_url(), CacheConfig::default())
    }

    /// Answers GET `path` with `status` and `body`
    ///
    /// `path` is relative to the base URL and includes any query string.
    pub fn route(&self, path: &str, status: u16, body: impl Into<String>) {
        self.routes
            .lock()
            .unwrap()
            .responses
            .insert(format!("{}{}", API_PREFIX, path), (status, body.into()));
    }

    /// Requests received for exactly `path`
    pub fn hits(&self, path: &str) -> usize {
        let full = format!("{}{}", API_PREFIX, path);
        self.routes
            .lock()
            .unwrap()
            .hits
            .iter()
            .filter(|hit| **hit == full)
            .count()
    }

    /// Requests received for any path starting with `prefix`
    pub fn hits_with_prefix(&self, prefix: &str) -> usize {
        let full = format!("{}{}", API_PREFIX, prefix);
        self.routes
            .lock()
            .unwrap()
            .hits
            .iter()
            .filter(|hit| hit.starts_with(&full))
            .count()
    }

    /// A `/pokemon/{id}` body whose species URL points back at this server
    pub fn pokemon_json(&self, id: u32, name: &str) -> String {
        serde_json::json!({
            "id": id,
            "name": name,
            "height": 4,
            "weight": 60,
            "types": [
                { "slot": 1, "type": { "name": "electric", "url": "" } }
            ],
            "species": {
                "name": name,
                "url": format!("{}/pokemon-species/{}/", self.base_url(), id)
            }
        })
        .to_string()
    }

    /// Serves `name` under both its id and its name
    pub fn route_pokemon(&self, id: u32, name: &str) {
        let body = self.pokemon_json(id, name);
        self.route(&format!("/pokemon/{}", id), 200, body.clone());
        self.route(&format!("/pokemon/{}", name), 200, body);
    }
}

async fn respond(mut stream: TcpStream, routes: Arc<Mutex<Routes>>) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                request.extend_from_slice(&buf[..n]);
                if request.windows(4).any(|window| window == b"\r\n\r\n") {
                    break;
                }
            }
        }
    }

    let request = String::from_utf8_lossy(&request);
    let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();

    let (status, body) = {
        let mut routes = routes.lock().unwrap();
        routes.hits.push(path.clone());
        routes
            .responses
            .get(&path)
            .cloned()
            .unwrap_or_else(|| (404, r#"{"detail":"Not found."}"#.to_string()))
    };

    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}
