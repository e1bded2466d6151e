//! Platform delegate seam.

use std::sync::Arc;

use emblem_core::context::BindingContext;
use parking_lot::Mutex;

/// Receives computed badge updates for actual rendering.
///
/// Implementations are platform-specific (taskbar overlay, dock icon, tray
/// indicator). Calls are fire-and-forget: the dispatcher never awaits a
/// result, and an implementation that performs real I/O must hand off
/// internally rather than block. At most one call is made per successfully
/// resolved set/clear operation; dropped or invalid requests never reach the
/// delegate.
pub trait BadgeDelegate: Send + Sync {
    /// Apply a badge with the given display form. The empty string is the
    /// flag-style badge (indicator with no number).
    fn apply_badge(&self, context: &BindingContext, display: &str);

    /// Remove any badge for the context.
    fn remove_badge(&self, context: &BindingContext);
}

/// Delegate for platforms with no badge surface; every call is a no-op.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopDelegate;

impl BadgeDelegate for NoopDelegate {
    fn apply_badge(&self, _context: &BindingContext, _display: &str) {}
    fn remove_badge(&self, _context: &BindingContext) {}
}

/// One recorded delegate invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DelegateCall {
    /// `apply_badge` with the bound context and display form.
    Apply(BindingContext, String),
    /// `remove_badge` with the bound context.
    Remove(BindingContext),
}

/// Delegate that records every call, in order.
///
/// Test support shared between unit and integration tests: clones observe the
/// same call log.
#[derive(Clone, Debug, Default)]
pub struct RecordingDelegate {
    calls: Arc<Mutex<Vec<DelegateCall>>>,
}

impl RecordingDelegate {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the calls recorded so far.
    pub fn calls(&self) -> Vec<DelegateCall> {
        self.calls.lock().clone()
    }

    /// Number of calls recorded so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl BadgeDelegate for RecordingDelegate {
    fn apply_badge(&self, context: &BindingContext, display: &str) {
        self.calls
            .lock()
            .push(DelegateCall::Apply(context.clone(), display.to_string()));
    }

    fn remove_badge(&self, context: &BindingContext) {
        self.calls.lock().push(DelegateCall::Remove(context.clone()));
    }
}
