//! Error taxonomy and drop classification.
//!
//! Requests that cannot be dispatched are dropped, never answered: an
//! untrusted requester must not learn why an operation had no visible effect
//! (an "unknown connection" answer would leak liveness information about
//! other contexts). [`DropReason`] exists for metric labels and trace fields
//! only. The one fatal condition, registering a connection id twice, is a
//! panic at the registration site, not an error value: it indicates a broken
//! connection source, not a runtime condition to recover from.

use thiserror::Error;

/// Why a badge request was dropped without dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropReason {
    /// The connection id is absent from the registry (closed or forged).
    UnknownConnection,
    /// A non-positive badge count was requested.
    InvalidValue,
}

impl DropReason {
    /// Stable label for metrics and structured logging.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnknownConnection => "unknown_connection",
            Self::InvalidValue => "invalid_value",
        }
    }
}

/// Errors from fallible ambient operations.
#[derive(Debug, Error)]
pub enum EmblemError {
    /// Installing the global tracing subscriber failed.
    #[error("failed to install tracing subscriber: {reason}")]
    SubscriberInstall {
        /// Error description.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_reason_labels_are_snake_case() {
        for reason in [DropReason::UnknownConnection, DropReason::InvalidValue] {
            let label = reason.as_str();
            assert!(
                label.chars().all(|c| c.is_ascii_lowercase() || c == '_'),
                "label '{label}' must be snake_case"
            );
        }
    }

    #[test]
    fn drop_reason_labels_are_distinct() {
        assert_ne!(
            DropReason::UnknownConnection.as_str(),
            DropReason::InvalidValue.as_str()
        );
    }

    #[test]
    fn subscriber_install_display() {
        let err = EmblemError::SubscriberInstall {
            reason: "already set".to_string(),
        };
        assert!(err.to_string().contains("already set"));
    }
}
