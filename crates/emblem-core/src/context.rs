//! Execution-context identity for badge requests.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// The execution context a connection is permanently bound to.
///
/// Resolved from trusted host-side information when the connection is
/// admitted, never from caller-supplied request fields, so a requester can
/// only ever affect the context it actually runs in. The two kinds are a
/// closed set; dispatch to the platform delegate matches them exhaustively.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BindingContext {
    /// A page/frame execution context.
    Frame {
        /// Renderer process identifier.
        process_id: i32,
        /// Frame routing identifier within that process.
        frame_id: i32,
    },
    /// A background service worker, identified by its registration scope.
    ServiceWorker {
        /// Worker process identifier.
        process_id: i32,
        /// Registration scope URL.
        scope: Url,
    },
}

impl BindingContext {
    /// Context for a page/frame.
    pub fn frame(process_id: i32, frame_id: i32) -> Self {
        Self::Frame {
            process_id,
            frame_id,
        }
    }

    /// Context for a service worker registration scope.
    pub fn service_worker(process_id: i32, scope: Url) -> Self {
        Self::ServiceWorker { process_id, scope }
    }

    /// The process identifier, whichever kind this is.
    pub fn process_id(&self) -> i32 {
        match self {
            Self::Frame { process_id, .. } | Self::ServiceWorker { process_id, .. } => *process_id,
        }
    }
}

impl fmt::Display for BindingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Frame {
                process_id,
                frame_id,
            } => write!(f, "frame({process_id}:{frame_id})"),
            Self::ServiceWorker { process_id, scope } => {
                write!(f, "service_worker({process_id}, {scope})")
            }
        }
    }
}
