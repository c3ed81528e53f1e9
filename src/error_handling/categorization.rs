//! Error categorization.
//!
//! Maps `reqwest` errors onto the coarse `LookupFailure` categories used in logs.

use super::types::LookupFailure;

/// Categorizes a `reqwest::Error` into a `LookupFailure`.
///
/// Status codes are checked first, then the transport-level error kinds.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> LookupFailure {
    if let Some(status) = error.status() {
        return LookupFailure::Status(status.as_u16());
    }

    if error.is_timeout() {
        LookupFailure::Timeout
    } else if error.is_connect() {
        LookupFailure::Connect
    } else if error.is_body() || error.is_decode() {
        LookupFailure::Body
    } else {
        LookupFailure::Other(error.to_string())
    }
}
