//! Tracing subscriber installation.
//!
//! The workspace crates only emit `tracing` events; installing the global
//! subscriber belongs to the embedding binary. Filter directives come from
//! the `EMBLEM_LOG` environment variable (standard `EnvFilter` syntax),
//! defaulting to `info`.

use tracing_subscriber::EnvFilter;

use crate::errors::EmblemError;

/// Log output encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Text,
    /// Newline-delimited JSON for log shippers.
    Json,
}

/// Install the global tracing subscriber.
///
/// Fails if a global subscriber is already installed (calling this twice, or
/// embedding into a host that installed its own).
pub fn init_logging(format: LogFormat) -> Result<(), EmblemError> {
    let filter = EnvFilter::try_from_env("EMBLEM_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|e| EmblemError::SubscriberInstall {
        reason: e.to_string(),
    })?;
    tracing::debug!(?format, "tracing subscriber installed");
    Ok(())
}
