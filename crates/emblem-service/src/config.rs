//! Service configuration.

use serde::{Deserialize, Serialize};

/// Configuration for one [`crate::service::BadgeService`] instance.
///
/// Constructed (or deserialized) by the composition root that owns the
/// session. All fields carry serde defaults so a partial document
/// deserializes cleanly.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Capacity of the command channel between connection handles and the
    /// owning task. A handle that outruns the service by more than this is
    /// backpressured (its send awaits), not dropped.
    #[serde(default = "default_command_buffer")]
    pub command_buffer: usize,
    /// Master switch. When `false` the service runs with dispatch disabled,
    /// as if no platform delegate were present; registration and drop
    /// accounting still happen.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_command_buffer() -> usize {
    64
}

fn default_enabled() -> bool {
    true
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            command_buffer: default_command_buffer(),
            enabled: default_enabled(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.command_buffer, 64);
        assert!(config.enabled);
    }

    #[test]
    fn empty_document_deserializes_to_defaults() {
        let config: ServiceConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.command_buffer, 64);
        assert!(config.enabled);
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config: ServiceConfig = serde_json::from_str(r#"{"enabled": false}"#).unwrap();
        assert!(!config.enabled);
        assert_eq!(config.command_buffer, 64);
    }

    #[test]
    fn roundtrip() {
        let config = ServiceConfig {
            command_buffer: 8,
            enabled: false,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: ServiceConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.command_buffer, 8);
        assert!(!back.enabled);
    }
}
