//! Error types for backend access

/// Backend access error.
///
/// Only write paths surface these; reads substitute fallback data instead.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Invalid identifier: {0:?}")]
    InvalidId(String),
}

/// Result type alias for backend operations
pub type Result<T> = std::result::Result<T, ApiError>;

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

impl From<fleetdeck_core::Error> for ApiError {
    fn from(err: fleetdeck_core::Error) -> Self {
        match err {
            fleetdeck_core::Error::HealthCheckNotFound(id) => ApiError::NotFound(id),
            fleetdeck_core::Error::HostNotFound(host) => ApiError::NotFound(host),
            other => ApiError::Conflict(other.to_string()),
        }
    }
}

impl ApiError {
    pub fn conflict<S: Into<String>>(msg: S) -> Self {
        ApiError::Conflict(msg.into())
    }

    pub fn invalid_action<S: Into<String>>(msg: S) -> Self {
        ApiError::InvalidAction(msg.into())
    }

    /// Whether the error came from the network or a non-2xx reply
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Http(_) | ApiError::Status { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_error_maps_to_conflict() {
        let err: ApiError = fleetdeck_core::Error::transition("completed", "approved").into();
        assert!(matches!(err, ApiError::Conflict(_)));
        assert!(err.to_string().contains("completed -> approved"));
    }

    #[test]
    fn test_not_found_maps() {
        let err: ApiError = fleetdeck_core::Error::HealthCheckNotFound("hc-9".into()).into();
        assert!(matches!(err, ApiError::NotFound(ref id) if id == "hc-9"));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_status_display() {
        let err = ApiError::Status {
            status: 503,
            body: "unavailable".into(),
        };
        assert_eq!(err.to_string(), "Backend returned 503: unavailable");
        assert!(err.is_transport());
    }
}
