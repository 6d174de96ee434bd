//! Error types for the dashboard.

use thiserror::Error;

/// Errors surfaced by the dashboard and its backend adapters.
///
/// Only boundary calls produce these. Aggregation never fails.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The request could not be completed or returned a non-success status.
    #[error("{operation} request failed: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered, but with a status we do not accept.
    #[error("{operation} returned HTTP {status}")]
    Status {
        operation: &'static str,
        status: u16,
    },

    /// The response body did not decode into the expected shape.
    #[error("{operation} response could not be decoded: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Reading a log file for upload failed.
    #[error("failed to read upload file: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration rejected by validation.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl DashboardError {
    /// Returns true for failures that happened while talking to the backend.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            DashboardError::Transport { .. }
                | DashboardError::Status { .. }
                | DashboardError::Decode { .. }
        )
    }

    /// Name of the backend operation that failed, if any.
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            DashboardError::Transport { operation, .. }
            | DashboardError::Status { operation, .. }
            | DashboardError::Decode { operation, .. } => Some(operation),
            DashboardError::Io(_) | DashboardError::Config(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_is_transport() {
        let err = DashboardError::Status {
            operation: "summary",
            status: 502,
        };
        assert!(err.is_transport());
        assert_eq!(err.operation(), Some("summary"));
        assert_eq!(err.to_string(), "summary returned HTTP 502");
    }

    #[test]
    fn test_config_error_is_not_transport() {
        let err = DashboardError::Config("empty base_url".to_string());
        assert!(!err.is_transport());
        assert_eq!(err.operation(), None);
    }
}
