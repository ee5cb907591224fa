//! Shared test utilities for API integration tests

#![allow(dead_code)]

use std::fs;

use letrasgo::client::ApiClient;
use letrasgo::config::Config;
use letrasgo::http_server::{start_server, ApiState, ServerHandle};
use letrasgo::store::{parse_entries, ContentCatalog, GameDb, SAMPLE_CONTENT};
use tempfile::TempDir;

/// A server on an ephemeral port with its own database and public dir
pub struct TestServer {
    pub dir: TempDir,
    pub base_url: String,
    handle: Option<ServerHandle>,
}

impl TestServer {
    pub fn start() -> Self {
        Self::start_with(|_| {})
    }

    pub fn start_with(customize: impl FnOnce(&mut Config)) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");

        let public_dir = dir.path().join("public");
        fs::create_dir_all(public_dir.join("js")).expect("Failed to create public dir");
        fs::write(public_dir.join("index.html"), "<h1>LetrasGo</h1>").unwrap();
        fs::write(public_dir.join("landing.html"), "<h1>Entrar</h1>").unwrap();
        fs::write(public_dir.join("game.html"), "<h1>Juego</h1>").unwrap();
        fs::write(public_dir.join("js").join("game.js"), "console.log('hola');").unwrap();
        fs::write(dir.path().join("secret.txt"), "do not serve").unwrap();

        let mut config = Config::default();
        config.server.port = 0;
        config.server.workers = 2;
        config.server.public_dir = public_dir.display().to_string();
        config.storage.db_path = dir.path().join("letras.db").display().to_string();
        config.auth.bcrypt_cost = 4;
        customize(&mut config);

        let db = GameDb::open(&config.db_path()).expect("Failed to open db");
        ContentCatalog::new(db.clone())
            .seed(parse_entries(SAMPLE_CONTENT).unwrap())
            .expect("Failed to seed content");

        let handle = start_server(ApiState::new(config, db)).expect("Failed to start server");
        Self {
            base_url: handle.base_url(),
            dir,
            handle: Some(handle),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.base_url)
    }

    /// Client with a freshly registered account
    pub fn registered_client(&self, username: &str) -> ApiClient {
        let mut client = self.client();
        client
            .register(username, "secreto")
            .expect("Failed to register");
        client
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.shutdown();
        }
    }
}

/// Status and JSON body of a response, whether it succeeded or not
pub fn status_and_json(result: Result<ureq::Response, ureq::Error>) -> (u16, serde_json::Value) {
    let resp = match result {
        Ok(resp) => resp,
        Err(ureq::Error::Status(_, resp)) => resp,
        Err(e) => panic!("transport error: {e}"),
    };
    let status = resp.status();
    let body = resp.into_string().unwrap();
    let json = serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}
