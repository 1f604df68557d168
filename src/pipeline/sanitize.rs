//! URL sanitizer.
//!
//! # Responsibilities
//! - Remove percent-encoded invisible characters (`%E2%80%8B`, `%EF%BB%BF`, ...)
//! - Remove literal invisible/format characters
//! - Replace the request URI before any routing decision is made
//!
//! # Design Decisions
//! - Recognized set: U+200B–U+200F, U+2028–U+202F, U+2060, U+FEFF
//! - Removal repeats until the path stops changing, so the output is a fixed
//!   point even when a removal splices two halves of an encoded sequence
//! - Malformed escapes are left as-is; the sanitizer never fails

use std::borrow::Cow;

use axum::http::{uri::PathAndQuery, Request, Uri};

use crate::pipeline::RequestContext;

/// Whether `c` is one of the invisible characters stripped from paths.
pub fn is_invisible(c: char) -> bool {
    matches!(
        c,
        '\u{200B}'..='\u{200F}' | '\u{2028}'..='\u{202F}' | '\u{2060}' | '\u{FEFF}'
    )
}

/// Remove invisible characters, raw or percent-encoded, from a path.
pub fn clean_path(path: &str) -> Cow<'_, str> {
    let mut current = Cow::Borrowed(path);
    loop {
        let next = strip_literal(&strip_encoded(&current));
        if next == current.as_ref() {
            return current;
        }
        current = Cow::Owned(next);
    }
}

fn strip_encoded(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match encoded_invisible_len(tail) {
            Some(len) => rest = &tail[len..],
            None => {
                out.push('%');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn strip_literal(input: &str) -> String {
    input.chars().filter(|c| !is_invisible(*c)).collect()
}

/// Byte length of a leading percent-encoded invisible character, if any.
///
/// Every character in the set encodes to three UTF-8 bytes, i.e. nine
/// ASCII characters of `%XX` triplets.
fn encoded_invisible_len(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut decoded = [0u8; 3];
    for (n, slot) in decoded.iter_mut().enumerate() {
        let at = n * 3;
        if bytes.get(at) != Some(&b'%') {
            return None;
        }
        let hi = hex_value(*bytes.get(at + 1)?)?;
        let lo = hex_value(*bytes.get(at + 2)?)?;
        *slot = (hi << 4) | lo;
    }
    let c = std::str::from_utf8(&decoded).ok()?.chars().next()?;
    is_invisible(c).then_some(9)
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Rebuild `uri` with a cleaned path, keeping the query untouched.
///
/// Returns `None` when nothing changed or the cleaned URI cannot be built.
fn clean_uri(uri: &Uri) -> Option<Uri> {
    let original = uri.path();
    let cleaned = match clean_path(original) {
        Cow::Borrowed(_) => return None,
        Cow::Owned(cleaned) if cleaned.is_empty() => "/".to_string(),
        Cow::Owned(cleaned) => cleaned,
    };

    let path_and_query = match uri.query() {
        Some(query) => format!("{}?{}", cleaned, query),
        None => cleaned.clone(),
    };

    let mut parts = uri.clone().into_parts();
    let rebuilt = PathAndQuery::try_from(path_and_query)
        .map_err(|e| e.to_string())
        .and_then(|pq| {
            parts.path_and_query = Some(pq);
            Uri::from_parts(parts).map_err(|e| e.to_string())
        });

    match rebuilt {
        Ok(uri) => {
            tracing::info!(original = %original, cleaned = %cleaned, "Removed invisible characters from path");
            Some(uri)
        }
        Err(e) => {
            tracing::warn!(path = %original, error = %e, "Could not rebuild sanitized URI; keeping original");
            None
        }
    }
}

/// Outermost request mapper: runs before the router sees the path.
pub fn sanitize_request<B>(mut request: Request<B>) -> Request<B> {
    if let Some(uri) = clean_uri(request.uri()) {
        *request.uri_mut() = uri;
    }
    request
}

/// Pipeline stage form of the sanitizer.
pub fn apply(mut ctx: RequestContext) -> RequestContext {
    if let Some(uri) = clean_uri(&ctx.uri) {
        ctx.uri = uri;
    }
    ctx
}
