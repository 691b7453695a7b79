//! Handling for the read endpoint's JSONP-style responses.
//!
//! The spreadsheet web app was written for browser script-tag loading: when a
//! `callback` query parameter is present it wraps the JSON payload in a call
//! to that name. We fetch over plain HTTP instead, so the padding is just
//! text to strip. Bare JSON responses are accepted as well.

use anyhow::{Context, Result};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::de::DeserializeOwned;

/// Generate a unique callback name for a single request, e.g. `cb_k3j9x2mp7q`.
pub fn callback_name() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(10)
        .map(char::from)
        .collect();
    format!("cb_{}", suffix.to_lowercase())
}

/// Strip `<callback>(...)` padding from a response body, if present.
///
/// Returns the inner payload for a padded body and the input unchanged
/// otherwise. Only the callback name used for this request is recognized.
pub fn unwrap_padding<'a>(body: &'a str, callback: &str) -> &'a str {
    let trimmed = body.trim();
    let Some(inner) = trimmed.strip_prefix(callback) else {
        return body;
    };
    let inner = inner.trim_start();
    let Some(inner) = inner.strip_prefix('(') else {
        return body;
    };
    let inner = inner.trim_end();
    let inner = inner.strip_suffix(';').unwrap_or(inner).trim_end();
    match inner.strip_suffix(')') {
        Some(payload) => payload,
        None => body,
    }
}

/// Parse a read-endpoint response, padded or bare, into `T`.
pub fn parse_payload<T: DeserializeOwned>(body: &str, callback: &str) -> Result<T> {
    let payload = unwrap_padding(body, callback);
    serde_json::from_str(payload).context("invalid JSON payload from read endpoint")
}
