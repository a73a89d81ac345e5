//! Throttling hints from the Graph API
//!
//! Graph answers 429 (and sometimes 503) with a `Retry-After` header. The
//! value is normally an integer number of seconds but may be an HTTP-date.

use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};
use tracing::warn;

/// Upper bound for a hint in either form; anything further out is ignored.
const MAX_HINT_SECS: u64 = 3600;

/// Parse a `Retry-After` header value
///
/// The header can be either:
/// - An integer number of seconds (e.g., "30")
/// - An HTTP-date (e.g., "Fri, 31 Dec 2025 23:59:59 GMT"), converted to
///   seconds from now
///
/// Returns `None` when the value cannot be interpreted or asks for more than
/// an hour, so the caller falls back to its own backoff schedule.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    let value = value.trim();

    let secs = if let Ok(seconds) = value.parse::<u64>() {
        seconds
    } else if let Ok(date) = chrono::DateTime::parse_from_rfc2822(value) {
        let target = date.with_timezone(&chrono::Utc);
        (target - chrono::Utc::now()).num_seconds().max(0) as u64
    } else {
        warn!(value, "Could not parse Retry-After header, ignoring it");
        return None;
    };

    if secs > MAX_HINT_SECS {
        warn!(value, max_secs = MAX_HINT_SECS, "Retry-After hint too far out, ignoring it");
        return None;
    }
    Some(Duration::from_secs(secs))
}

/// Extract the `Retry-After` hint from response headers
pub fn retry_after_from_headers(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_retry_after)
}
