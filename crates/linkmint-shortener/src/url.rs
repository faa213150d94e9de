use crate::error::{AllocatorError, Result};
use url::Url;

/// Longest accepted URL, measured on the normalized form.
pub const MAX_URL_LENGTH: usize = 2048;

/// Validates an original URL and returns its normalized form.
///
/// The URL must parse, use `http` or `https` and name a host. The returned
/// string is the parser's serialization, which is ASCII and canonical enough
/// that trivially different spellings of one URL dedup to a single link.
pub fn normalize_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AllocatorError::InvalidArgument(
            "URL cannot be empty".to_string(),
        ));
    }

    let parsed = Url::parse(trimmed).map_err(|e| {
        AllocatorError::InvalidArgument(format!("malformed URL '{}': {e}", trimmed))
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AllocatorError::InvalidArgument(format!(
            "URL scheme must be http or https: {}",
            parsed.scheme()
        )));
    }

    if parsed.host().is_none() {
        return Err(AllocatorError::InvalidArgument(format!(
            "URL must have a host: {}",
            trimmed
        )));
    }

    let normalized = String::from(parsed);
    if normalized.len() > MAX_URL_LENGTH {
        return Err(AllocatorError::InvalidArgument(format!(
            "URL is longer than {} bytes",
            MAX_URL_LENGTH
        )));
    }

    Ok(normalized)
}
