//! Storage-key naming: the per-user namespace transform, display-name
//! sanitization, and the prefix-based ownership check.
//!
//! `namespace` is the single source of truth for a user's storage prefix.
//! It is called both when a new key is constructed at upload time and when
//! a caller-supplied key is validated at read/delete time; a second
//! implementation of this transform must never be introduced.

use crate::errors::AppError;

/// Derives the storage namespace for a verified identity.
///
/// Lowercases the input, rewrites the first `@` to `_at_`, then replaces
/// every remaining character outside `[a-z0-9._-]` with `_`. Total and
/// deterministic; idempotent on input that is already namespace-shaped.
pub fn namespace(identity: &str) -> String {
    identity
        .to_lowercase()
        .replacen('@', "_at_", 1)
        .chars()
        .map(|c| {
            if matches!(c, 'a'..='z' | '0'..='9' | '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Storage prefix owned by the given identity: `users/<namespace>/`.
pub fn user_prefix(identity: &str) -> String {
    format!("users/{}/", namespace(identity))
}

/// Rejects any key that does not fall under the caller's own prefix.
///
/// This string-prefix test is the only access control on storage keys. A
/// key outside the namespace is rejected uniformly, whether it arrived
/// malicious or merely malformed.
pub fn ensure_owned(identity: &str, key: &str) -> Result<(), AppError> {
    if key.starts_with(&user_prefix(identity)) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Maximum length of a sanitized base name, in characters.
const MAX_BASE_NAME_LEN: usize = 100;

/// Sanitizes a display name for use inside a storage key.
///
/// The base name (everything before the last dot) has each character
/// outside `[a-zA-Z0-9._-]` replaced with `_` and is truncated to 100
/// characters; the extension is reattached verbatim. A name without an
/// extension gets no suffix.
pub fn sanitize_file_name(name: &str) -> String {
    let (base, extension) = match name.rsplit_once('.') {
        Some((base, ext)) if !ext.is_empty() => (base, Some(ext)),
        _ => (name, None),
    };

    let sanitized: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_BASE_NAME_LEN)
        .collect();

    match extension {
        Some(ext) => format!("{sanitized}.{ext}"),
        None => sanitized,
    }
}

/// Builds the canonical resume storage key. The format is preserved exactly
/// for compatibility with objects written by earlier deployments:
/// `users/<namespace>/original-resumes/<epoch-millis>_<sanitizedFileName>`.
pub fn resume_key(identity: &str, timestamp_millis: i64, file_name: &str) -> String {
    format!(
        "{}original-resumes/{}_{}",
        user_prefix(identity),
        timestamp_millis,
        sanitize_file_name(file_name)
    )
}
