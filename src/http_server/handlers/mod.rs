//! HTTP request handlers for the auth, game and static file endpoints.

mod assets;
mod auth;
mod game;

pub use assets::handle_static;
pub use auth::{handle_check, handle_login, handle_logout, handle_register};
pub use game::{handle_content, handle_progress};

use tracing::error;

use super::respond_json;
use super::types::{failure, ApiState};
use crate::domain::UserAccount;
use crate::store::{ProgressStore, Session};

const SESSION_COOKIE: &str = "token";

/// Session token from `Authorization: Bearer ...` or the `token` cookie.
/// The header wins when both are present.
pub(crate) fn request_token(request: &tiny_http::Request) -> Option<String> {
    let headers = request.headers();

    let bearer = headers
        .iter()
        .find(|h| h.field.equiv("Authorization"))
        .and_then(|h| {
            let value = h.value.as_str().trim();
            let (scheme, token) = value.split_once(' ')?;
            scheme.eq_ignore_ascii_case("bearer").then(|| token.trim())
        })
        .filter(|token| !token.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .iter()
        .filter(|h| h.field.equiv("Cookie"))
        .flat_map(|h| h.value.as_str().split(';'))
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
        })
}

/// `Set-Cookie` value carrying a session token
pub(crate) fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie =
        format!("{SESSION_COOKIE}={token}; HttpOnly; SameSite=Strict; Path=/; Max-Age={max_age_secs}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that removes the session cookie
pub(crate) fn cleared_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}

/// Resolve the caller's session and account, if any.
///
/// Storage failures are logged and treated as "not signed in" by callers
/// that only want to know, while [`require_user`] reports them as 500.
fn current_user(
    state: &ApiState,
    request: &tiny_http::Request,
) -> Result<Option<(Session, UserAccount)>, crate::store::StoreError> {
    let Some(token) = request_token(request) else {
        return Ok(None);
    };
    let Some(session) = state.sessions.resolve(&token)? else {
        return Ok(None);
    };
    let Some(account) = state.users.get_user(session.user_id)? else {
        return Ok(None);
    };
    Ok(Some((session, account)))
}

/// The signed-in account, or the request is answered with 401/500 and `None`
/// is returned.
fn require_user(
    state: &ApiState,
    request: tiny_http::Request,
) -> Option<(UserAccount, tiny_http::Request)> {
    match current_user(state, &request) {
        Ok(Some((_, account))) => Some((account, request)),
        Ok(None) => {
            respond_json(request, 401, failure("Not authorized, sign in first."));
            None
        }
        Err(e) => {
            error!("[letras:http] Failed to resolve session: {}", e);
            respond_json(request, 500, failure("Server error."));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc", 604800, false);
        assert_eq!(
            cookie,
            "token=abc; HttpOnly; SameSite=Strict; Path=/; Max-Age=604800"
        );
        assert!(session_cookie("abc", 10, true).ends_with("; Secure"));
        assert!(cleared_cookie(false).starts_with("token=; "));
        assert!(cleared_cookie(false).contains("Max-Age=0"));
    }
}
