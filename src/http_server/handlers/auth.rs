//! Account handlers: register, login, logout, check.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;
use tracing::{error, info, warn};

use super::super::types::{failure, success, ApiState, CredentialsRequest};
use super::super::{header, respond_json, respond_json_with_headers};
use super::{cleared_cookie, current_user, request_token, session_cookie};
use crate::domain::UserAccount;
use crate::store::{hash_password, verify_password, NewUser, StoreError};

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\p{N}_.\-]+$").expect("username pattern is valid"));

/// Trimmed, lowercased login name
pub(crate) fn normalize_username(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Check register input; returns the normalized username.
pub(crate) fn validate_registration(
    state: &ApiState,
    username: &str,
    password: &str,
) -> Result<String, String> {
    let username = normalize_username(username);
    let auth = &state.config.auth;
    if username.chars().count() < auth.min_username_len {
        return Err(format!(
            "Username must be at least {} characters long.",
            auth.min_username_len
        ));
    }
    if !USERNAME_RE.is_match(&username) {
        return Err(
            "Username may only contain letters, digits, '_', '.' and '-'.".to_string(),
        );
    }
    if password.chars().count() < auth.min_password_len {
        return Err(format!(
            "Password must be at least {} characters long.",
            auth.min_password_len
        ));
    }
    Ok(username)
}

fn parse_credentials(body: &str) -> Option<(String, String)> {
    let req: CredentialsRequest = serde_json::from_str(body).ok()?;
    let username = req.username.filter(|u| !u.trim().is_empty())?;
    let password = req.password.filter(|p| !p.is_empty())?;
    Some((username, password))
}

/// Start a session and answer with the token cookie and `{token, user}`
fn respond_with_session(
    state: &ApiState,
    request: tiny_http::Request,
    status_code: u16,
    message: &str,
    account: &UserAccount,
) {
    let session = match state.sessions.create(account.id) {
        Ok(session) => session,
        Err(e) => {
            error!("[letras:auth] Failed to create session: {}", e);
            respond_json(request, 500, failure("Server error."));
            return;
        }
    };

    let cookie = session_cookie(
        &session.token,
        state.session_max_age(),
        state.config.auth.secure_cookies,
    );
    respond_json_with_headers(
        request,
        status_code,
        success(
            Some(message),
            Some(json!({ "token": session.token, "user": account.profile() })),
        ),
        header("Set-Cookie", &cookie),
    );
}

pub fn handle_register(state: &ApiState, body: &str, request: tiny_http::Request) {
    let Some((username, password)) = parse_credentials(body) else {
        respond_json(request, 400, failure("Username and password are required."));
        return;
    };

    let username = match validate_registration(state, &username, &password) {
        Ok(username) => username,
        Err(message) => {
            respond_json(request, 400, failure(message));
            return;
        }
    };

    let credential_hash = match hash_password(&password, state.config.auth.bcrypt_cost) {
        Ok(hash) => hash,
        Err(e) => {
            error!("[letras:auth] Failed to hash password: {}", e);
            respond_json(request, 500, failure("Server error."));
            return;
        }
    };
    let new_user = NewUser {
        credential_hash,
        username,
    };
    let account = match state.users.create_user(&new_user) {
        Ok(account) => account,
        Err(StoreError::UsernameTaken(_)) => {
            respond_json(request, 400, failure("Username already exists."));
            return;
        }
        Err(e) => {
            error!("[letras:auth] Failed to create user: {}", e);
            respond_json(request, 500, failure("Server error."));
            return;
        }
    };

    info!(
        "[letras:auth] Registered user {} ({})",
        account.username, account.id
    );
    respond_with_session(state, request, 201, "User registered.", &account);
}

pub fn handle_login(state: &ApiState, body: &str, request: tiny_http::Request) {
    let Some((username, password)) = parse_credentials(body) else {
        respond_json(request, 400, failure("Username and password are required."));
        return;
    };

    let account = match state.users.find_by_username(&normalize_username(&username)) {
        Ok(account) => account,
        Err(e) => {
            error!("[letras:auth] Failed to look up user: {}", e);
            respond_json(request, 500, failure("Server error."));
            return;
        }
    };

    match account {
        Some(account) if verify_password(&password, &account.credential_hash) => {
            info!("[letras:auth] User {} signed in", account.id);
            respond_with_session(state, request, 200, "Signed in.", &account);
        }
        _ => {
            warn!("[letras:auth] Failed sign-in attempt");
            respond_json(request, 401, failure("Invalid credentials."));
        }
    }
}

pub fn handle_logout(state: &ApiState, request: tiny_http::Request) {
    if let Some(token) = request_token(&request) {
        if let Err(e) = state.sessions.revoke(&token) {
            error!("[letras:auth] Failed to revoke session: {}", e);
            respond_json(request, 500, failure("Failed to sign out."));
            return;
        }
    }

    respond_json_with_headers(
        request,
        200,
        success(Some("Signed out."), None),
        header("Set-Cookie", &cleared_cookie(state.config.auth.secure_cookies)),
    );
}

pub fn handle_check(state: &ApiState, request: tiny_http::Request) {
    match current_user(state, &request) {
        Ok(Some((_, account))) => respond_json(
            request,
            200,
            success(
                None,
                Some(json!({ "isAuthenticated": true, "user": account.profile() })),
            ),
        ),
        Ok(None) => respond_json(
            request,
            200,
            success(None, Some(json!({ "isAuthenticated": false }))),
        ),
        Err(e) => {
            error!("[letras:auth] Failed to check session: {}", e);
            let mut body = failure("Failed to check authentication.");
            body["data"] = json!({ "isAuthenticated": false });
            respond_json(request, 500, body);
        }
    }
}
