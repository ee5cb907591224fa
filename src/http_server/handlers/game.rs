//! Game handlers: puzzle content and progress updates.

use serde_json::json;
use tracing::{error, warn};

use super::super::respond_json;
use super::super::types::{failure, success, ApiState};
use super::require_user;
use crate::domain::{Chapter, Difficulty, Mode};
use crate::store::ContentStore;
use crate::unlock::{RawCompletion, UnlockError};

/// Split `/api/game/content/{mode}/{difficulty}/{chapter}` into its parts
fn parse_content_path(path: &str) -> Result<(Mode, Difficulty, Chapter), String> {
    let rest = path
        .strip_prefix("/api/game/content/")
        .unwrap_or_default()
        .trim_end_matches('/');
    let parts: Vec<&str> = rest.split('/').collect();
    let [mode, difficulty, chapter] = parts.as_slice() else {
        return Err("Missing parameters: mode, difficulty and chapter are required.".to_string());
    };

    let mode: Mode = mode.parse()?;
    let difficulty: Difficulty = difficulty.parse()?;
    let chapter: Chapter = chapter
        .parse()
        .map_err(|_| "Chapter must be a number between 1 and 10.".to_string())?;
    Ok((mode, difficulty, chapter))
}

pub fn handle_content(state: &ApiState, path: &str, request: tiny_http::Request) {
    let Some((_, request)) = require_user(state, request) else {
        return;
    };

    let (mode, difficulty, chapter) = match parse_content_path(path) {
        Ok(parts) => parts,
        Err(message) => {
            respond_json(request, 400, failure(message));
            return;
        }
    };

    match state.content.get(mode, difficulty, chapter) {
        Ok(Some(spec)) => respond_json(request, 200, success(None, Some(json!(spec)))),
        Ok(None) => respond_json(
            request,
            404,
            failure("No content found for this level."),
        ),
        Err(e) => {
            error!("[letras:game] Failed to load {}/{}/{}: {}", mode, difficulty, chapter, e);
            respond_json(request, 500, failure("Server error."));
        }
    }
}

pub fn handle_progress(state: &ApiState, body: &str, request: tiny_http::Request) {
    let Some((account, request)) = require_user(state, request) else {
        return;
    };

    let raw: RawCompletion = match serde_json::from_str(body) {
        Ok(raw) => raw,
        Err(e) => {
            respond_json(
                request,
                400,
                failure(format!("Invalid progress body: {e}")),
            );
            return;
        }
    };

    match state.unlocker.complete_raw(account.id, &raw) {
        Ok(update) => respond_json(
            request,
            200,
            success(Some("Progress updated."), Some(json!(update))),
        ),
        Err(e) => {
            let status = unlock_error_status(&e);
            if status >= 500 {
                error!("[letras:game] Progress update for user {} failed: {}", account.id, e);
            } else {
                warn!("[letras:game] Progress update for user {} rejected: {}", account.id, e);
            }
            let message = match e {
                UnlockError::Storage(_) => "Server error.".to_string(),
                other => other.to_string(),
            };
            respond_json(request, status, failure(message));
        }
    }
}

fn unlock_error_status(error: &UnlockError) -> u16 {
    match error {
        UnlockError::Validation(_) => 400,
        UnlockError::UserNotFound(_) => 404,
        UnlockError::Conflict(_) => 409,
        UnlockError::Storage(_) => 500,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_content_path() {
        let (mode, difficulty, chapter) =
            parse_content_path("/api/game/content/words/facil/3").unwrap();
        assert_eq!(mode, Mode::Words);
        assert_eq!(difficulty, Difficulty::Easy);
        assert_eq!(chapter.get(), 3);

        assert!(parse_content_path("/api/game/content/sentences/difficult/10/").is_ok());
        assert!(parse_content_path("/api/game/content/words/easy").is_err());
        assert!(parse_content_path("/api/game/content/words/easy/1/2").is_err());
        assert!(parse_content_path("/api/game/content/letters/easy/1").is_err());
        assert!(parse_content_path("/api/game/content/words/easy/0").is_err());
        assert!(parse_content_path("/api/game/content/words/easy/abc").is_err());
    }
}
