//! Pending-popup state and the suspending `show` call
//!
//! [`PopupHostState`] holds at most one in-flight popup request. `show`
//! publishes the request into an observable slot, suspends the caller on a
//! single-shot channel and resumes it with the user's result, or `None`
//! when the popup was dismissed. Concurrent `show` calls queue behind an
//! async mutex and never overlap: the second caller's request is not
//! published until the first has resolved and the slot is clear again.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Mutex};

use tokio::sync::{oneshot, watch, Mutex as AsyncMutex};
use tokio_stream::wrappers::WatchStream;
use tracing::debug;

use crate::id::{Popup, PopupKey};

/// Erased result payload traveling through the resolution channel.
/// `None` stands for dismissal.
pub type PopupOutcome = Option<Box<dyn Any + Send>>;

type Resolver = Arc<Mutex<Option<oneshot::Sender<PopupOutcome>>>>;

/// Shared handle to the single popup slot.
///
/// Clones observe and mutate the same slot. One clone typically lives in
/// application state for `show` calls while another is owned by the
/// [`PopupHost`](crate::PopupHost) rendering it.
#[derive(Clone)]
pub struct PopupHostState {
    inner: Arc<StateInner>,
}

struct StateInner {
    /// Serializes `show` callers; held for the whole request lifetime.
    gate: AsyncMutex<()>,
    /// The observable slot. `None` while no request is in flight.
    current: watch::Sender<Option<PendingPopup>>,
}

impl PopupHostState {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(StateInner {
                gate: AsyncMutex::new(()),
                current: watch::channel(None).0,
            }),
        }
    }

    /// Show `popup` and suspend until the user resolves it.
    ///
    /// Returns `Some(value)` when the user acted, `None` when the popup
    /// was dismissed. Concurrent callers queue: a second `show` starts
    /// only after the first has resolved and the slot has cleared.
    ///
    /// Cancelling the calling task while suspended clears the slot and
    /// releases the queue; the request is simply abandoned.
    ///
    /// # Panics
    ///
    /// Panics if the popup is resolved with a value that is not
    /// `P::Output`. The identity/result pairing is fixed by the [`Popup`]
    /// impl and is trusted here rather than revalidated.
    pub async fn show<P: Popup>(&self, popup: P) -> Option<P::Output> {
        let outcome = self.show_erased(Arc::new(popup)).await?;
        Some(
            *outcome
                .downcast::<P::Output>()
                .expect("popup resolved with a value of the wrong result type"),
        )
    }

    async fn show_erased(&self, id: Arc<dyn PopupKey>) -> PopupOutcome {
        let _serialized = self.inner.gate.lock().await;

        let (sender, receiver) = oneshot::channel();
        let pending = PendingPopup {
            id,
            resolver: Arc::new(Mutex::new(Some(sender))),
        };
        debug!("popup pending: {:?}", pending.id());
        self.inner.current.send_replace(Some(pending));

        // Clears the slot on every exit path, including cancellation of
        // the suspended caller. Runs before the gate is released.
        let _clear = ClearOnExit {
            current: &self.inner.current,
        };

        match receiver.await {
            Ok(outcome) => outcome,
            // Resolver dropped without resolving; same as a dismissal.
            Err(_) => None,
        }
    }

    /// Snapshot of the in-flight request, if any.
    pub fn current(&self) -> Option<PendingPopup> {
        self.inner.current.borrow().clone()
    }

    /// Whether a request is currently in flight.
    pub fn is_showing(&self) -> bool {
        self.inner.current.borrow().is_some()
    }

    /// Reactive subscription to the slot. The receiver is notified
    /// whenever a request is published or cleared.
    pub fn subscribe(&self) -> watch::Receiver<Option<PendingPopup>> {
        self.inner.current.subscribe()
    }

    /// The subscription as a `Stream`, for `select!`-style render loops.
    pub fn watch(&self) -> WatchStream<Option<PendingPopup>> {
        WatchStream::new(self.subscribe())
    }

    /// Resolve `pending` and clear the slot if it still holds that same
    /// request. A stale scope (for a request that already left the slot)
    /// only hits the idempotent resolver and leaves the slot untouched.
    pub(crate) fn finish(&self, pending: &PendingPopup, outcome: PopupOutcome) {
        pending.resolve(outcome);
        self.inner.current.send_if_modified(|current| match current {
            Some(live) if live.same_request(pending) => {
                *current = None;
                true
            }
            _ => false,
        });
    }
}

impl Default for PopupHostState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PopupHostState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopupHostState")
            .field("current", &*self.inner.current.borrow())
            .finish()
    }
}

struct ClearOnExit<'a> {
    current: &'a watch::Sender<Option<PendingPopup>>,
}

impl Drop for ClearOnExit<'_> {
    fn drop(&mut self) {
        self.current.send_replace(None);
    }
}

/// A live popup request: the identity being shown plus its single-shot
/// resolution handle.
///
/// Clones share the handle; resolving through any clone wakes the
/// suspended caller.
#[derive(Clone)]
pub struct PendingPopup {
    id: Arc<dyn PopupKey>,
    resolver: Resolver,
}

impl PendingPopup {
    /// The identity being shown.
    pub fn id(&self) -> &dyn PopupKey {
        self.id.as_ref()
    }

    pub(crate) fn id_arc(&self) -> &Arc<dyn PopupKey> {
        &self.id
    }

    /// Whether this request was submitted for identity type `P`.
    pub fn id_is<P: Popup>(&self) -> bool {
        self.id.as_any().is::<P>()
    }

    /// Resolve the request. `None` means the user dismissed the popup.
    ///
    /// The handle is single-shot: resolving an already-resolved or
    /// cancelled request is a no-op, never an error.
    pub fn resolve(&self, outcome: PopupOutcome) {
        let sender = self
            .resolver
            .lock()
            .expect("popup resolver lock poisoned")
            .take();
        if let Some(sender) = sender {
            debug!("popup resolved: {:?}", self.id());
            // Send fails when the caller was cancelled; the outcome has
            // nowhere to go either way.
            let _ = sender.send(outcome);
        }
    }

    /// Resolve with no value.
    pub fn dismiss(&self) {
        self.resolve(None);
    }

    /// Resolve with `value`.
    pub fn respond<T: Any + Send>(&self, value: T) {
        self.resolve(Some(Box::new(value)));
    }

    pub(crate) fn same_request(&self, other: &PendingPopup) -> bool {
        Arc::ptr_eq(&self.resolver, &other.resolver)
    }
}

impl fmt::Debug for PendingPopup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingPopup").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct ConfirmQuit;

    impl Popup for ConfirmQuit {
        type Output = bool;
    }

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct PickNumber;

    impl Popup for PickNumber {
        type Output = i32;
    }

    async fn settled() {
        // Give spawned show() calls a chance to reach their suspension
        // point on the current-thread runtime.
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn show_resumes_with_the_responded_value() {
        let state = PopupHostState::new();
        let task = tokio::spawn({
            let state = state.clone();
            async move { state.show(PickNumber).await }
        });
        settled().await;

        let pending = state.current().expect("request should be pending");
        assert!(pending.id_is::<PickNumber>());
        pending.respond(123i32);

        assert_eq!(task.await.unwrap(), Some(123));
        assert!(state.current().is_none());
    }

    #[tokio::test]
    async fn dismissal_resumes_with_none() {
        let state = PopupHostState::new();
        let task = tokio::spawn({
            let state = state.clone();
            async move { state.show(ConfirmQuit).await }
        });
        settled().await;

        state.current().expect("request should be pending").dismiss();

        assert_eq!(task.await.unwrap(), None);
        assert!(!state.is_showing());
    }

    #[tokio::test]
    async fn resolving_twice_is_a_no_op() {
        let state = PopupHostState::new();
        let task = tokio::spawn({
            let state = state.clone();
            async move { state.show(PickNumber).await }
        });
        settled().await;

        let pending = state.current().expect("request should be pending");
        pending.respond(7i32);
        pending.respond(99i32);
        pending.dismiss();

        assert_eq!(task.await.unwrap(), Some(7));
        assert!(state.current().is_none());
    }

    #[tokio::test]
    async fn concurrent_shows_are_serialized() {
        let state = PopupHostState::new();

        let first = tokio::spawn({
            let state = state.clone();
            async move { state.show(ConfirmQuit).await }
        });
        settled().await;
        let second = tokio::spawn({
            let state = state.clone();
            async move { state.show(PickNumber).await }
        });
        settled().await;

        // Only the first request is observable until it resolves.
        let pending = state.current().expect("request should be pending");
        assert!(pending.id_is::<ConfirmQuit>());

        pending.respond(true);
        assert_eq!(first.await.unwrap(), Some(true));
        settled().await;

        // The queued request surfaces only now.
        let pending = state.current().expect("second request should surface");
        assert!(pending.id_is::<PickNumber>());
        pending.respond(5i32);
        assert_eq!(second.await.unwrap(), Some(5));
        assert!(state.current().is_none());
    }

    #[tokio::test]
    async fn cancelling_the_caller_clears_the_slot_and_releases_the_queue() {
        let state = PopupHostState::new();
        let task = tokio::spawn({
            let state = state.clone();
            async move { state.show(ConfirmQuit).await }
        });
        settled().await;
        assert!(state.is_showing());

        task.abort();
        let _ = task.await;
        settled().await;
        assert!(!state.is_showing());

        // A follow-up show is not blocked by the abandoned request.
        let task = tokio::spawn({
            let state = state.clone();
            async move { state.show(PickNumber).await }
        });
        settled().await;
        let pending = state.current().expect("slot should accept new requests");
        pending.respond(1i32);
        assert_eq!(task.await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn resolving_a_cancelled_request_is_inert() {
        let state = PopupHostState::new();
        let task = tokio::spawn({
            let state = state.clone();
            async move { state.show(PickNumber).await }
        });
        settled().await;

        let pending = state.current().expect("request should be pending");
        task.abort();
        let _ = task.await;
        settled().await;

        // The handle outlived the caller; resolving it must not panic or
        // resurrect the request.
        pending.respond(3i32);
        assert!(!state.is_showing());
    }

    #[tokio::test]
    async fn subscription_sees_publish_and_clear() {
        let state = PopupHostState::new();
        let mut observer = state.subscribe();
        assert!(observer.borrow_and_update().is_none());

        let task = tokio::spawn({
            let state = state.clone();
            async move { state.show(ConfirmQuit).await }
        });
        observer.changed().await.unwrap();
        assert!(observer.borrow_and_update().is_some());

        state.current().unwrap().respond(false);
        assert_eq!(task.await.unwrap(), Some(false));
        assert!(observer.borrow_and_update().is_none());
    }
}
