//! Metric name constants.
//!
//! The workspace crates emit via the `metrics` facade only; the embedding
//! host installs its own recorder/exporter.

/// Connections admitted total (counter).
pub const CONNECTIONS_OPENED_TOTAL: &str = "badge_connections_opened_total";
/// Connections unregistered total (counter).
pub const CONNECTIONS_CLOSED_TOTAL: &str = "badge_connections_closed_total";
/// Live connections (gauge).
pub const CONNECTIONS_ACTIVE: &str = "badge_connections_active";
/// Badge set dispatches total (counter).
pub const BADGE_SET_TOTAL: &str = "badge_set_total";
/// Badge clear dispatches total (counter).
pub const BADGE_CLEAR_TOTAL: &str = "badge_clear_total";
/// Requests dropped without dispatch (counter, labels: reason).
pub const BADGE_DROPPED_TOTAL: &str = "badge_requests_dropped_total";
