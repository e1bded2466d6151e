//! Per-session badge service: one owning task, serialized mutations.
//!
//! One [`BadgeService`] exists per host-managed session, constructed on
//! session start and shut down (or dropped) on session end. All registry and
//! dispatch state lives on a single tokio task; connection handles send
//! commands over an mpsc channel, so operations from independent connections
//! are processed strictly sequentially and the registry map needs no locking.
//!
//! ```no_run
//! use emblem_service::config::ServiceConfig;
//! use emblem_service::delegate::NoopDelegate;
//! use emblem_service::service::BadgeService;
//! use std::sync::Arc;
//!
//! # async fn run() {
//! let service = BadgeService::spawn(ServiceConfig::default(), Some(Arc::new(NoopDelegate)));
//! let badge = service.bind_frame(7, 3).await;
//! badge.set(Some(5)).await;
//! badge.clear().await;
//! badge.disconnect().await;
//! service.shutdown().await;
//! # }
//! ```

use std::sync::Arc;

use emblem_core::context::BindingContext;
use emblem_core::ids::ConnectionId;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;

use crate::config::ServiceConfig;
use crate::delegate::BadgeDelegate;
use crate::manager::BadgeManager;

/// Commands processed by the owning task, in arrival order.
#[derive(Debug)]
enum Command {
    Register {
        id: ConnectionId,
        context: BindingContext,
    },
    Set {
        id: ConnectionId,
        requested: Option<i64>,
    },
    Clear {
        id: ConnectionId,
    },
    Unregister {
        id: ConnectionId,
    },
    Shutdown,
}

/// A running badge service for one session.
///
/// Owns the task that serializes every registry and dispatch operation.
/// Dropping the service without [`shutdown`](Self::shutdown) leaves the task
/// running until the last connection handle is gone.
pub struct BadgeService {
    tx: mpsc::Sender<Command>,
    task: JoinHandle<()>,
}

impl BadgeService {
    /// Spawn the owning task. Must be called within a tokio runtime.
    ///
    /// With `config.enabled == false`, or `delegate == None`, the service
    /// runs with dispatch disabled: requests still go through resolution and
    /// validation (so drop accounting stays accurate), but nothing reaches a
    /// platform surface.
    pub fn spawn(config: ServiceConfig, delegate: Option<Arc<dyn BadgeDelegate>>) -> Self {
        let (tx, rx) = mpsc::channel(config.command_buffer);
        let delegate = if config.enabled { delegate } else { None };
        let manager = BadgeManager::new(delegate);
        let task = tokio::spawn(run(manager, rx));
        Self { tx, task }
    }

    /// Admit a page/frame execution context and return its request handle.
    ///
    /// The context comes from trusted host-side information; nothing in it is
    /// taken from the requester.
    pub async fn bind_frame(&self, process_id: i32, frame_id: i32) -> BadgeHandle {
        self.bind(BindingContext::frame(process_id, frame_id)).await
    }

    /// Admit a service worker registration scope and return its request
    /// handle.
    pub async fn bind_service_worker(&self, process_id: i32, scope: Url) -> BadgeHandle {
        self.bind(BindingContext::service_worker(process_id, scope))
            .await
    }

    async fn bind(&self, context: BindingContext) -> BadgeHandle {
        let id = ConnectionId::new();
        self.send(Command::Register {
            id: id.clone(),
            context,
        })
        .await;
        BadgeHandle {
            id,
            tx: self.tx.clone(),
            closed: false,
        }
    }

    async fn send(&self, command: Command) {
        if self.tx.send(command).await.is_err() {
            debug!("badge service stopped; command dropped");
        }
    }

    /// Stop the owning task after draining commands queued before this call.
    ///
    /// Handles that outlive the service remain usable; their operations are
    /// silently dropped.
    pub async fn shutdown(self) {
        self.send(Command::Shutdown).await;
        match self.task.await {
            Ok(()) => {}
            // Re-raise fatal conditions (duplicate registration) instead of
            // swallowing them on the worker task.
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => warn!(error = %e, "badge service task aborted"),
        }
    }
}

async fn run(mut manager: BadgeManager, mut rx: mpsc::Receiver<Command>) {
    while let Some(command) = rx.recv().await {
        match command {
            Command::Register { id, context } => manager.register(id, context),
            Command::Set { id, requested } => manager.set_badge(&id, requested),
            Command::Clear { id } => manager.clear_badge(&id),
            Command::Unregister { id } => manager.unregister(&id),
            Command::Shutdown => break,
        }
    }
    debug!(
        connections = manager.connection_count(),
        "badge service stopped"
    );
}

/// The untrusted request surface for one connection.
///
/// Operations are implicitly scoped to the connection's own bound context;
/// there is no way to name another context through a handle. Obtained from
/// [`BadgeService::bind_frame`] / [`BadgeService::bind_service_worker`] by
/// the trusted connection source, then handed to the transport serving the
/// requester.
pub struct BadgeHandle {
    id: ConnectionId,
    tx: mpsc::Sender<Command>,
    closed: bool,
}

impl BadgeHandle {
    /// The connection identity this handle is bound to.
    pub fn connection_id(&self) -> &ConnectionId {
        &self.id
    }

    /// Request a badge: `None` for a flag-style badge, `Some(count)` for a
    /// numeric one. Invalid or unresolvable requests are dropped with no
    /// feedback.
    pub async fn set(&self, value: Option<i64>) {
        self.send(Command::Set {
            id: self.id.clone(),
            requested: value,
        })
        .await;
    }

    /// Request badge removal. Idempotent.
    pub async fn clear(&self) {
        self.send(Command::Clear { id: self.id.clone() }).await;
    }

    /// Close the connection, waiting until the close notification is queued.
    ///
    /// Preferred over dropping the handle: `Drop` can only notify
    /// best-effort (it cannot await a full queue).
    pub async fn disconnect(mut self) {
        self.closed = true;
        self.send(Command::Unregister { id: self.id.clone() }).await;
    }

    async fn send(&self, command: Command) {
        if self.tx.send(command).await.is_err() {
            debug!(conn = %self.id, "badge service stopped; request dropped");
        }
    }
}

impl Drop for BadgeHandle {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        match self.tx.try_send(Command::Unregister { id: self.id.clone() }) {
            // A closed channel means the service is gone along with the
            // registry — nothing left to clean up.
            Ok(()) | Err(TrySendError::Closed(_)) => {}
            Err(TrySendError::Full(_)) => {
                warn!(conn = %self.id, "close notification dropped; command queue full");
            }
        }
    }
}
