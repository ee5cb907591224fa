//! HTTP server for the browser client and the terminal client
//!
//! Serves:
//! - POST /api/auth/register, /api/auth/login, /api/auth/logout
//! - GET  /api/auth/check
//! - GET  /api/game/content/{mode}/{difficulty}/{chapter}
//! - PUT  /api/game/progress
//! - GET  /api/ping
//! - static files from the configured public directory

mod handlers;
mod types;

pub use types::{ApiState, CredentialsRequest};

use std::io::Read;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tiny_http::{Header, Response, Server};
use tracing::{debug, error, info, warn};

use types::failure;

/// How long a worker waits for a request before re-checking the stop flag
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Running server. Workers keep serving until [`ServerHandle::shutdown`].
pub struct ServerHandle {
    addr: SocketAddr,
    stop: Arc<AtomicBool>,
    workers: Vec<JoinHandle<()>>,
}

impl ServerHandle {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop accepting requests and wait for in-flight ones to finish
    pub fn shutdown(self) {
        self.stop.store(true, Ordering::SeqCst);
        for worker in self.workers {
            if worker.join().is_err() {
                error!("[letras:http] Worker thread panicked");
            }
        }
        info!("[letras:http] Server on {} stopped", self.addr);
    }
}

/// Bind `bind:port` (port 0 picks a free one) and start the worker threads.
pub fn start_server(state: ApiState) -> Result<ServerHandle> {
    let bind_addr = state.config.listen_addr();
    let server = Server::http(&bind_addr)
        .map_err(|e| anyhow!("Failed to start server on {}: {}", bind_addr, e))?;
    let addr = server
        .server_addr()
        .to_ip()
        .with_context(|| format!("Server on {} has no IP address", bind_addr))?;

    match state.sessions.purge_expired() {
        Ok(0) => {}
        Ok(n) => info!("[letras:http] Purged {} expired sessions", n),
        Err(e) => warn!("[letras:http] Failed to purge expired sessions: {}", e),
    }

    let server = Arc::new(server);
    let stop = Arc::new(AtomicBool::new(false));
    let worker_count = state.config.server.workers.max(1);
    let mut workers = Vec::with_capacity(worker_count);
    for index in 0..worker_count {
        let server = Arc::clone(&server);
        let stop = Arc::clone(&stop);
        let state = state.clone();
        let worker = thread::Builder::new()
            .name(format!("letras-http-{index}"))
            .spawn(move || worker_loop(&server, &stop, &state))
            .context("Failed to spawn HTTP worker")?;
        workers.push(worker);
    }

    info!(
        "[letras:http] Server listening on http://{} ({} workers, public dir: {})",
        addr,
        worker_count,
        state.public_dir.display()
    );

    Ok(ServerHandle {
        addr,
        stop,
        workers,
    })
}

fn worker_loop(server: &Server, stop: &AtomicBool, state: &ApiState) {
    while !stop.load(Ordering::SeqCst) {
        match server.recv_timeout(POLL_INTERVAL) {
            Ok(Some(request)) => route(state, request),
            Ok(None) => {}
            Err(e) => {
                error!("[letras:http] Failed to receive request: {}", e);
            }
        }
    }
}

fn route(state: &ApiState, mut request: tiny_http::Request) {
    let method = request.method().to_string();
    let url = request.url().to_string();
    let path = url.split('?').next().unwrap_or(url.as_str());
    debug!("[letras:http] {} {}", method, path);

    match (method.as_str(), path) {
        ("GET", "/api/ping") => {
            respond_json(
                request,
                200,
                serde_json::json!({
                    "status": "ok",
                    "version": env!("CARGO_PKG_VERSION"),
                }),
            );
        }

        ("POST", "/api/auth/register") => {
            let body = match read_request_body(&mut request, state.config.server.max_body_bytes) {
                Ok(body) => body,
                Err(response) => {
                    let _ = request.respond(response);
                    return;
                }
            };
            handlers::handle_register(state, &body, request);
        }
        ("POST", "/api/auth/login") => {
            let body = match read_request_body(&mut request, state.config.server.max_body_bytes) {
                Ok(body) => body,
                Err(response) => {
                    let _ = request.respond(response);
                    return;
                }
            };
            handlers::handle_login(state, &body, request);
        }
        ("POST", "/api/auth/logout") => handlers::handle_logout(state, request),
        ("GET", "/api/auth/check") => handlers::handle_check(state, request),

        ("GET", p) if p.starts_with("/api/game/content/") => {
            handlers::handle_content(state, p, request);
        }
        ("PUT", "/api/game/progress") => {
            let body = match read_request_body(&mut request, state.config.server.max_body_bytes) {
                Ok(body) => body,
                Err(response) => {
                    let _ = request.respond(response);
                    return;
                }
            };
            handlers::handle_progress(state, &body, request);
        }

        (_, p) if p == "/api" || p.starts_with("/api/") => {
            respond_json(request, 404, failure("Route not found."));
        }
        ("GET" | "HEAD", p) => handlers::handle_static(state, p, request),
        _ => {
            respond_json(request, 405, failure("Method not allowed."));
        }
    }
}

pub(crate) fn json_content_type() -> Header {
    Header::from_bytes(&b"Content-Type"[..], &b"application/json; charset=utf-8"[..]).unwrap()
}

/// `None` if the value contains bytes not allowed in a header
pub(crate) fn header(name: &str, value: &str) -> Option<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).ok()
}

fn read_request_body(
    request: &mut tiny_http::Request,
    max_body_bytes: usize,
) -> Result<String, Response<std::io::Cursor<Vec<u8>>>> {
    let mut body = String::new();
    let mut reader = request.as_reader().take((max_body_bytes + 1) as u64);
    if let Err(e) = reader.read_to_string(&mut body) {
        error!("[letras:http] Failed to read body: {}", e);
        let response = Response::from_string(failure("Malformed request body.").to_string())
            .with_status_code(400)
            .with_header(json_content_type());
        return Err(response);
    }

    if body.len() > max_body_bytes {
        let response = Response::from_string(failure("Request body too large.").to_string())
            .with_status_code(413)
            .with_header(json_content_type());
        return Err(response);
    }

    Ok(body)
}

pub(crate) fn respond_json(
    request: tiny_http::Request,
    status_code: u16,
    value: serde_json::Value,
) {
    respond_json_with_headers(request, status_code, value, Vec::new());
}

pub(crate) fn respond_json_with_headers(
    request: tiny_http::Request,
    status_code: u16,
    value: serde_json::Value,
    headers: impl IntoIterator<Item = Header>,
) {
    let body = serde_json::to_string(&value)
        .unwrap_or_else(|_| "{\"success\":false,\"message\":\"serialize\"}".to_string());
    let mut response = Response::from_string(body)
        .with_status_code(status_code)
        .with_header(json_content_type());
    for header in headers {
        response.add_header(header);
    }
    let _ = request.respond(response);
}
