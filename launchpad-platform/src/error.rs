//! Error types for launchpad-platform.

use thiserror::Error;

/// Failures reported by the platform API or the object store.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// 401/403: the API key was rejected.
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// The resource already exists (e.g. app name taken).
    #[error("conflict: {message}")]
    Conflict { message: String },

    /// Any other non-success HTTP status.
    #[error("HTTP {code} from platform: {message}")]
    Status { code: u16, message: String },

    /// Connection, DNS or TLS failure before a response arrived.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body did not have the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// The object store rejected or failed a request.
    #[error("object storage error: {0}")]
    Storage(String),
}

/// Map an HTTP error status and the platform's error body onto a kind.
///
/// The platform reports a taken app name as 422 `invalid_params`, so the
/// message is inspected as well as the status.
pub(crate) fn classify(code: u16, id: Option<&str>, message: String) -> PlatformError {
    match code {
        401 | 403 => PlatformError::Unauthorized { message },
        409 => PlatformError::Conflict { message },
        422 if id == Some("invalid_params") && message.contains("already taken") => {
            PlatformError::Conflict { message }
        }
        _ => PlatformError::Status { code, message },
    }
}
