//! Static files for the browser client.

use std::fs::File;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use super::super::types::{failure, ApiState};
use super::super::{header, respond_json};

/// Map a request path to a file below `public_dir`.
///
/// `/`, `/landing` and `/game` are the three pages; everything else is
/// looked up as-is. Paths that try to leave the directory yield `None`.
pub(crate) fn resolve_asset(public_dir: &Path, path: &str) -> Option<PathBuf> {
    let relative = match path {
        "/" | "" => "index.html",
        "/landing" => "landing.html",
        "/game" => "game.html",
        other => other.trim_start_matches('/'),
    };
    if relative.is_empty() || relative.contains('\\') {
        return None;
    }

    let relative = Path::new(relative);
    if !relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        return None;
    }
    Some(public_dir.join(relative))
}

pub(crate) fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "json" => "application/json; charset=utf-8",
        "txt" => "text/plain; charset=utf-8",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "woff2" => "font/woff2",
        _ => "application/octet-stream",
    }
}

pub fn handle_static(state: &ApiState, path: &str, request: tiny_http::Request) {
    let file = resolve_asset(&state.public_dir, path)
        .filter(|p| p.is_file())
        .and_then(|p| File::open(&p).ok().map(|f| (p, f)));

    let Some((file_path, file)) = file else {
        debug!("[letras:http] No static file for {}", path);
        respond_json(request, 404, failure("Not found."));
        return;
    };

    let mut response = tiny_http::Response::from_file(file);
    if let Some(h) = header("Content-Type", content_type(&file_path)) {
        response.add_header(h);
    }
    let _ = request.respond(response);
}
