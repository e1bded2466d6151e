//! Badge dispatch: resolve, validate, saturate, forward.

use std::sync::Arc;

use emblem_core::context::BindingContext;
use emblem_core::errors::DropReason;
use emblem_core::ids::ConnectionId;
use emblem_core::value::BadgeValue;
use metrics::{counter, gauge};
use tracing::debug;

use crate::delegate::BadgeDelegate;
use crate::metrics::{
    BADGE_CLEAR_TOTAL, BADGE_DROPPED_TOTAL, BADGE_SET_TOTAL, CONNECTIONS_ACTIVE,
    CONNECTIONS_CLOSED_TOTAL, CONNECTIONS_OPENED_TOTAL,
};
use crate::registry::BindingRegistry;

/// Maintains the connection-to-context record and dispatches badge changes to
/// a delegate.
///
/// Dispatch is identity-safe by construction: an operation is tagged only
/// with a connection id, and the context it affects is whatever that id was
/// admitted with. Requests that cannot be dispatched (unknown ids,
/// non-positive counts) are dropped with no feedback to the requester.
pub struct BadgeManager {
    registry: BindingRegistry,
    delegate: Option<Arc<dyn BadgeDelegate>>,
}

impl BadgeManager {
    /// Create a manager.
    ///
    /// `None` means the platform has no badge surface: dispatch degrades to a
    /// no-op while resolution, validation, and drop accounting still run.
    pub fn new(delegate: Option<Arc<dyn BadgeDelegate>>) -> Self {
        Self {
            registry: BindingRegistry::new(),
            delegate,
        }
    }

    /// Admit a connection with its trusted context.
    ///
    /// # Panics
    ///
    /// Panics if `id` is already bound (broken connection source).
    pub fn register(&mut self, id: ConnectionId, context: BindingContext) {
        debug!(conn = %id, context = %context, "connection registered");
        self.registry.register(id, context);
        counter!(CONNECTIONS_OPENED_TOTAL).increment(1);
        gauge!(CONNECTIONS_ACTIVE).increment(1.0);
    }

    /// Drop a connection's binding. Idempotent.
    pub fn unregister(&mut self, id: &ConnectionId) {
        if self.registry.unregister(id) {
            debug!(conn = %id, "connection unregistered");
            counter!(CONNECTIONS_CLOSED_TOTAL).increment(1);
            gauge!(CONNECTIONS_ACTIVE).decrement(1.0);
        }
    }

    /// Set (or re-apply) the badge for the connection's bound context.
    ///
    /// `None` requests a flag-style badge. Unknown connections and
    /// non-positive counts are dropped silently.
    pub fn set_badge(&self, id: &ConnectionId, requested: Option<i64>) {
        let Some(context) = self.registry.resolve(id) else {
            drop_request(id, DropReason::UnknownConnection);
            return;
        };
        let value = match BadgeValue::from_request(requested) {
            Ok(value) => value,
            Err(reason) => {
                drop_request(id, reason);
                return;
            }
        };
        let badge_display = value.display();
        debug!(conn = %id, context = %context, display = %badge_display, "badge set");
        counter!(BADGE_SET_TOTAL).increment(1);
        if let Some(delegate) = &self.delegate {
            delegate.apply_badge(context, &badge_display);
        }
    }

    /// Clear the badge for the connection's bound context.
    ///
    /// Idempotent from the caller's perspective; unknown connections are
    /// dropped silently.
    pub fn clear_badge(&self, id: &ConnectionId) {
        let Some(context) = self.registry.resolve(id) else {
            drop_request(id, DropReason::UnknownConnection);
            return;
        };
        debug!(conn = %id, context = %context, "badge cleared");
        counter!(BADGE_CLEAR_TOTAL).increment(1);
        if let Some(delegate) = &self.delegate {
            delegate.remove_badge(context);
        }
    }

    /// Number of live connections.
    pub fn connection_count(&self) -> usize {
        self.registry.len()
    }
}

fn drop_request(id: &ConnectionId, reason: DropReason) {
    debug!(conn = %id, reason = reason.as_str(), "badge request dropped");
    counter!(BADGE_DROPPED_TOTAL, "reason" => reason.as_str()).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delegate::{DelegateCall, RecordingDelegate};

    fn manager_with_recorder() -> (BadgeManager, RecordingDelegate) {
        let recorder = RecordingDelegate::new();
        let manager = BadgeManager::new(Some(Arc::new(recorder.clone())));
        (manager, recorder)
    }

    #[test]
    fn set_badge_dispatches_display_form() {
        let (mut manager, recorder) = manager_with_recorder();
        let id = ConnectionId::new();
        let ctx = BindingContext::frame(7, 3);
        manager.register(id.clone(), ctx.clone());

        manager.set_badge(&id, Some(5));
        assert_eq!(
            recorder.calls(),
            vec![DelegateCall::Apply(ctx, "5".to_string())]
        );
    }

    #[test]
    fn set_badge_saturates_large_counts() {
        let (mut manager, recorder) = manager_with_recorder();
        let id = ConnectionId::new();
        let ctx = BindingContext::frame(7, 3);
        manager.register(id.clone(), ctx.clone());

        manager.set_badge(&id, Some(150));
        assert_eq!(
            recorder.calls(),
            vec![DelegateCall::Apply(ctx, "99+".to_string())]
        );
    }

    #[test]
    fn flag_badge_dispatches_empty_display() {
        let (mut manager, recorder) = manager_with_recorder();
        let id = ConnectionId::new();
        let ctx = BindingContext::frame(1, 1);
        manager.register(id.clone(), ctx.clone());

        manager.set_badge(&id, None);
        assert_eq!(
            recorder.calls(),
            vec![DelegateCall::Apply(ctx, String::new())]
        );
    }

    #[test]
    fn clear_badge_dispatches_remove() {
        let (mut manager, recorder) = manager_with_recorder();
        let id = ConnectionId::new();
        let ctx = BindingContext::frame(7, 3);
        manager.register(id.clone(), ctx.clone());

        manager.clear_badge(&id);
        assert_eq!(recorder.calls(), vec![DelegateCall::Remove(ctx)]);
    }

    #[test]
    fn unknown_connection_produces_no_call() {
        let (manager, recorder) = manager_with_recorder();
        manager.set_badge(&ConnectionId::new(), Some(1));
        manager.clear_badge(&ConnectionId::new());
        assert_eq!(recorder.call_count(), 0);
    }

    #[test]
    fn operations_after_unregister_produce_no_call() {
        let (mut manager, recorder) = manager_with_recorder();
        let id = ConnectionId::new();
        manager.register(id.clone(), BindingContext::frame(7, 3));
        manager.unregister(&id);

        manager.set_badge(&id, Some(1));
        manager.clear_badge(&id);
        assert_eq!(recorder.call_count(), 0);
        assert_eq!(manager.connection_count(), 0);
    }

    #[test]
    fn non_positive_counts_are_dropped() {
        let (mut manager, recorder) = manager_with_recorder();
        let id = ConnectionId::new();
        manager.register(id.clone(), BindingContext::frame(1, 1));

        manager.set_badge(&id, Some(0));
        manager.set_badge(&id, Some(-7));
        assert_eq!(recorder.call_count(), 0);
    }

    #[test]
    fn double_unregister_is_a_no_op() {
        let (mut manager, _recorder) = manager_with_recorder();
        let id = ConnectionId::new();
        manager.register(id.clone(), BindingContext::frame(1, 1));
        manager.unregister(&id);
        manager.unregister(&id);
        assert_eq!(manager.connection_count(), 0);
    }

    #[test]
    #[should_panic(expected = "already bound")]
    fn duplicate_registration_panics() {
        let (mut manager, _recorder) = manager_with_recorder();
        let id = ConnectionId::new();
        manager.register(id.clone(), BindingContext::frame(1, 1));
        manager.register(id, BindingContext::frame(2, 2));
    }

    #[test]
    fn operations_never_cross_connections() {
        let (mut manager, recorder) = manager_with_recorder();
        let a = ConnectionId::new();
        let b = ConnectionId::new();
        let ctx_a = BindingContext::frame(7, 3);
        let ctx_b = BindingContext::frame(8, 1);
        manager.register(a.clone(), ctx_a.clone());
        manager.register(b.clone(), ctx_b.clone());

        manager.set_badge(&a, Some(5));
        manager.clear_badge(&a);

        for call in recorder.calls() {
            let context = match call {
                DelegateCall::Apply(context, _) | DelegateCall::Remove(context) => context,
            };
            assert_eq!(context, ctx_a.clone(), "operation on A referenced B's context");
        }
    }

    #[test]
    fn repeated_set_reapplies_same_display() {
        let (mut manager, recorder) = manager_with_recorder();
        let id = ConnectionId::new();
        let ctx = BindingContext::frame(1, 1);
        manager.register(id.clone(), ctx.clone());

        manager.set_badge(&id, Some(9));
        manager.set_badge(&id, Some(9));
        assert_eq!(
            recorder.calls(),
            vec![
                DelegateCall::Apply(ctx.clone(), "9".to_string()),
                DelegateCall::Apply(ctx, "9".to_string()),
            ]
        );
    }

    #[test]
    fn absent_delegate_is_a_noop() {
        let mut manager = BadgeManager::new(None);
        let id = ConnectionId::new();
        manager.register(id.clone(), BindingContext::frame(1, 1));
        manager.set_badge(&id, Some(5));
        manager.clear_badge(&id);
        assert_eq!(manager.connection_count(), 1);
    }

    #[test]
    fn worker_context_flows_through_dispatch() {
        let (mut manager, recorder) = manager_with_recorder();
        let id = ConnectionId::new();
        let scope = url::Url::parse("https://app.example/mail/").unwrap();
        let ctx = BindingContext::service_worker(4, scope);
        manager.register(id.clone(), ctx.clone());

        manager.set_badge(&id, Some(12));
        assert_eq!(
            recorder.calls(),
            vec![DelegateCall::Apply(ctx, "12".to_string())]
        );
    }
}
