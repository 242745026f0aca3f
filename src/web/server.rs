//! Minimal HTTP server exposing the simulator.
//!
//! Routes:
//! - `GET /`          driver picker page
//! - `GET /drivers`   grid as JSON
//! - `POST /simulate` run a simulation, respond with the summary

use crate::constants::{
    DEFAULT_MAX_IN_FLIGHT, DEFAULT_MAX_SIMULATIONS, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SERVER_PORT,
};
use crate::drivers::DriverRegistry;
use crate::errors::{ErrorBody, SimError};
use crate::simulator::{run_simulation, SimulationRequest};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;

const MAX_HEAD_BYTES: usize = 16 * 1024;
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Wall-clock limit for one simulation request
    pub request_timeout: Duration,
    pub max_simulations: u32,
    /// Simulations allowed to run at once. A timed-out request keeps its
    /// slot until the worker finishes.
    pub max_in_flight: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_SERVER_PORT,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_simulations: DEFAULT_MAX_SIMULATIONS,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }
}

impl ServerConfig {
    /// Defaults, with the port taken from `PORT` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            config.port = port;
        }
        config
    }
}

/// Shared state for all connections
pub struct WebServer {
    registry: Arc<DriverRegistry>,
    config: ServerConfig,
    in_flight: Arc<Semaphore>,
}

impl WebServer {
    pub fn new(registry: DriverRegistry, config: ServerConfig) -> Self {
        Self {
            registry: Arc::new(registry),
            in_flight: Arc::new(Semaphore::new(config.max_in_flight)),
            config,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// A parsed HTTP request
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    pub body: Vec<u8>,
}

/// An HTTP response ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    fn json(status: u16, body: String) -> Self {
        Self {
            status,
            content_type: "application/json",
            body,
        }
    }

    fn error(status: u16, err: &SimError) -> Self {
        let body = serde_json::to_string(&ErrorBody::from(err))
            .unwrap_or_else(|_| "{}".to_string());
        Self::json(status, body)
    }

    fn plain(status: u16, message: &str) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: message.to_string(),
        }
    }

    fn reason(&self) -> &'static str {
        match self.status {
            200 => "OK",
            400 => "Bad Request",
            404 => "Not Found",
            405 => "Method Not Allowed",
            408 => "Request Timeout",
            413 => "Payload Too Large",
            503 => "Service Unavailable",
            _ => "Internal Server Error",
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status,
            self.reason(),
            self.content_type,
            self.body.len(),
            self.body
        )
        .into_bytes()
    }
}

/// Start the web server on the configured port
pub async fn start_web_server(server: Arc<WebServer>) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], server.config.port));
    let listener = TcpListener::bind(addr).await?;

    log::info!("Web server listening on http://localhost:{}", server.config.port);

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let server = Arc::clone(&server);
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, addr, server).await {
                        log::warn!("Connection error from {}: {}", addr, e);
                    }
                });
            }
            Err(e) => {
                log::error!("Accept error: {}", e);
            }
        }
    }
}

/// Handle a single connection: one request, one response.
async fn handle_connection(
    mut stream: TcpStream,
    addr: SocketAddr,
    server: Arc<WebServer>,
) -> std::io::Result<()> {
    let response = match read_request(&mut stream).await? {
        Some(request) => {
            log::debug!("{} {} from {}", request.method, request.path, addr);
            route(request, &server).await
        }
        None => HttpResponse::plain(413, "request too large"),
    };

    if response.status >= 400 {
        log::info!("Responding {} to {}: {}", response.status, addr, response.body);
    }

    stream.write_all(&response.to_bytes()).await?;
    stream.shutdown().await
}

/// Read the request head and body. `None` when size limits are exceeded.
async fn read_request(stream: &mut TcpStream) -> std::io::Result<Option<HttpRequest>> {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];

    let head_end = loop {
        if let Some(pos) = find_head_end(&buf) {
            break pos;
        }
        if buf.len() > MAX_HEAD_BYTES {
            return Ok(None);
        }
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "connection closed before request head",
            ));
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let Some((method, path, content_length)) = parse_request_head(&head) else {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "malformed request line",
        ));
    };
    if content_length > MAX_BODY_BYTES {
        return Ok(None);
    }

    let mut body = buf[head_end + 4..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }
    body.truncate(content_length);

    Ok(Some(HttpRequest { method, path, body }))
}

fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

/// Parse the request line and `Content-Length` header.
pub fn parse_request_head(head: &str) -> Option<(String, String, usize)> {
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let target = request_line.next()?;
    let path = target.split('?').next().unwrap_or(target).to_string();

    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0);

    Some((method, path, content_length))
}

/// Dispatch a request to its handler.
pub async fn route(request: HttpRequest, server: &WebServer) -> HttpResponse {
    match (request.method.as_str(), request.path.as_str()) {
        ("GET", "/") => HttpResponse {
            status: 200,
            content_type: "text/html; charset=utf-8",
            body: include_str!("../../web/index.html").to_string(),
        },
        ("GET", "/drivers") => drivers_response(&server.registry),
        ("POST", "/simulate") => simulate_response(&request.body, server).await,
        (_, "/" | "/drivers" | "/simulate") => HttpResponse::plain(405, "method not allowed"),
        _ => HttpResponse::plain(404, "not found"),
    }
}

fn drivers_response(registry: &DriverRegistry) -> HttpResponse {
    match serde_json::to_string(registry.entries()) {
        Ok(body) => HttpResponse::json(200, body),
        Err(e) => HttpResponse::plain(500, &e.to_string()),
    }
}

async fn simulate_response(body: &[u8], server: &WebServer) -> HttpResponse {
    let config = match SimulationRequest::from_json(body)
        .and_then(|request| request.into_config(server.config.max_simulations))
    {
        Ok(config) => config,
        Err(e) => return HttpResponse::error(400, &e),
    };

    // Validate up front so bad input never reaches the worker pool
    if let Err(e) = config.validate(&server.registry) {
        return HttpResponse::error(400, &e);
    }

    // The permit moves into the worker, so the slot frees when the work
    // ends rather than when the request gives up waiting
    let permit = match Arc::clone(&server.in_flight).try_acquire_owned() {
        Ok(permit) => permit,
        Err(_) => {
            log::warn!(
                "Rejecting simulation: {} already running",
                server.config.max_in_flight
            );
            return HttpResponse::plain(503, "too many simulations in progress");
        }
    };

    let registry = Arc::clone(&server.registry);
    let task = tokio::task::spawn_blocking(move || {
        let result = run_simulation(&registry, &config);
        drop(permit);
        result
    });

    match tokio::time::timeout(server.config.request_timeout, task).await {
        Ok(Ok(Ok(report))) => match serde_json::to_string(&report) {
            Ok(body) => HttpResponse::json(200, body),
            Err(e) => HttpResponse::plain(500, &e.to_string()),
        },
        Ok(Ok(Err(e))) => HttpResponse::error(400, &e),
        Ok(Err(e)) => {
            log::error!("Simulation task failed: {}", e);
            HttpResponse::plain(500, "simulation failed")
        }
        Err(_) => {
            log::warn!(
                "Simulation exceeded {:?}; worker left to finish",
                server.config.request_timeout
            );
            HttpResponse::plain(408, "simulation timed out")
        }
    }
}
