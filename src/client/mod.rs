//! Blocking HTTP client for the game API
//!
//! Used by `letrasgo play` and the integration tests. The session token
//! returned by register/login is kept and sent as a bearer token on every
//! later call.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::domain::{Chapter, Completion, Difficulty, Mode, PuzzleSpec, UserProfile};
use crate::unlock::{ProgressUpdate, RawCompletion};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{}", format_http_error(*code, body))]
    Status { code: u16, body: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ClientError {
    /// HTTP status for server-side rejections
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// `{success, message?, data?}`
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    message: Option<String>,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct SessionData {
    token: String,
    user: UserProfile,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckData {
    is_authenticated: bool,
    #[serde(default)]
    user: Option<UserProfile>,
}

fn format_http_error(code: u16, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return format!("HTTP {code}");
    }

    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return format!("HTTP {code}: {body}");
    };

    match value.get("message").and_then(|v| v.as_str()) {
        Some(message) => format!("HTTP {code}: {message}"),
        None => format!("HTTP {code}: {body}"),
    }
}

pub struct ApiClient {
    base_url: String,
    agent: ureq::Agent,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .build();
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            agent,
            token: None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Server version from `/api/ping`
    pub fn ping(&self) -> Result<String, ClientError> {
        let value: Value = self.send_raw("GET", "/api/ping", None)?;
        value
            .get("version")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| ClientError::Decode("ping response has no version".to_string()))
    }

    pub fn register(&mut self, username: &str, password: &str) -> Result<UserProfile, ClientError> {
        self.start_session("/api/auth/register", username, password)
    }

    pub fn login(&mut self, username: &str, password: &str) -> Result<UserProfile, ClientError> {
        self.start_session("/api/auth/login", username, password)
    }

    pub fn logout(&mut self) -> Result<(), ClientError> {
        let _: Envelope<Value> = self.send_raw("POST", "/api/auth/logout", None)?;
        self.token = None;
        Ok(())
    }

    /// The signed-in profile, or `None` if the token is missing or stale
    pub fn check(&self) -> Result<Option<UserProfile>, ClientError> {
        let data: CheckData = self.send("GET", "/api/auth/check", None)?;
        Ok(data.user.filter(|_| data.is_authenticated))
    }

    pub fn content(
        &self,
        mode: Mode,
        difficulty: Difficulty,
        chapter: Chapter,
    ) -> Result<PuzzleSpec, ClientError> {
        let path = format!("/api/game/content/{mode}/{difficulty}/{chapter}");
        self.send("GET", &path, None)
    }

    pub fn update_progress(&self, completion: &Completion) -> Result<ProgressUpdate, ClientError> {
        let raw = RawCompletion::from(*completion);
        let body = json!({
            "mode": raw.mode,
            "difficulty": raw.difficulty,
            "chapter": raw.chapter,
            "scoreToAdd": raw.score_to_add,
        });
        self.send("PUT", "/api/game/progress", Some(body))
    }

    fn start_session(
        &mut self,
        path: &str,
        username: &str,
        password: &str,
    ) -> Result<UserProfile, ClientError> {
        let body = json!({ "username": username, "password": password });
        let data: SessionData = self.send("POST", path, Some(body))?;
        self.token = Some(data.token);
        Ok(data.user)
    }

    /// Send a request and unwrap the `data` field of the envelope
    fn send<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ClientError> {
        let envelope: Envelope<T> = self.send_raw(method, path, body)?;
        if !envelope.success {
            return Err(ClientError::Decode(
                envelope
                    .message
                    .unwrap_or_else(|| "request was not successful".to_string()),
            ));
        }
        envelope
            .data
            .ok_or_else(|| ClientError::Decode(format!("{path} returned no data")))
    }

    fn send_raw<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.agent.request(method, &url);
        if let Some(token) = self.token.as_deref() {
            req = req.set("Authorization", &format!("Bearer {token}"));
        }

        let result = match body {
            Some(body) => req.send_json(body),
            None => req.call(),
        };
        let resp = result.map_err(|e| match e {
            ureq::Error::Status(code, resp) => ClientError::Status {
                code,
                body: resp.into_string().unwrap_or_default(),
            },
            ureq::Error::Transport(t) => ClientError::Transport(t.to_string()),
        })?;

        let text = resp
            .into_string()
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| ClientError::Decode(format!("{e}: {text}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_http_error() {
        assert_eq!(format_http_error(500, ""), "HTTP 500");
        assert_eq!(format_http_error(502, "bad gateway"), "HTTP 502: bad gateway");
        assert_eq!(
            format_http_error(401, r#"{"success":false,"message":"Invalid credentials."}"#),
            "HTTP 401: Invalid credentials."
        );
        assert_eq!(format_http_error(400, r#"{"x":1}"#), r#"HTTP 400: {"x":1}"#);
    }

    #[test]
    fn test_status_error_display() {
        let err = ClientError::Status {
            code: 409,
            body: r#"{"success":false,"message":"try again"}"#.to_string(),
        };
        assert_eq!(err.status(), Some(409));
        assert_eq!(err.to_string(), "HTTP 409: try again");
    }

    #[test]
    fn test_base_url_is_trimmed() {
        let client = ApiClient::new("http://localhost:3000/");
        assert_eq!(client.base_url, "http://localhost:3000");
        assert!(client.token().is_none());
    }
}
