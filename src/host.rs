//! The host surface: renders the pending popup and routes input to it
//!
//! One `PopupHost` instance lives next to the application's render loop.
//! It observes the popup slot, resolves the entry and chrome for whatever
//! request is pending and draws it over the rest of the UI; user intent
//! flows back into the slot through the factory scope callbacks.

use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use tokio::sync::watch;
use tracing::warn;

use crate::chrome::{BottomSheetFactoryProvider, DialogFactoryProvider};
use crate::factory::{FactoryScope, PopupFactory, PopupFactoryProvider};
use crate::registry::{PopupEntry, PopupRegistry};
use crate::state::{PendingPopup, PopupHostState};
use crate::theme::PopupTheme;
use crate::Frame;

/// Bridges the popup slot to the terminal.
///
/// The host only ever *reads* the slot; every mutation flows back through
/// the [`FactoryScope`] callbacks wired to the chrome it renders.
pub struct PopupHost {
    state: PopupHostState,
    observer: watch::Receiver<Option<PendingPopup>>,
    registry: Arc<PopupRegistry>,
    providers: Vec<Box<dyn PopupFactoryProvider>>,
    resolved: Option<ResolvedPopup>,
}

/// Entry and chrome resolution cached for one pending request, so
/// re-renders caused by unrelated state do not repeat registry lookups or
/// provider scans.
struct ResolvedPopup {
    pending: PendingPopup,
    entry: PopupEntry,
    factory: Option<Box<dyn PopupFactory>>,
    scope: FactoryScope,
}

impl PopupHost {
    /// Host with the built-in chrome providers, dialog first, then bottom
    /// sheet.
    pub fn new(state: PopupHostState, registry: Arc<PopupRegistry>) -> Self {
        Self::with_providers(
            state,
            registry,
            vec![
                Box::new(DialogFactoryProvider::new()),
                Box::new(BottomSheetFactoryProvider::new()),
            ],
        )
    }

    /// Host with a custom, ordered chrome provider list. The first
    /// provider to offer a factory for an entry's metadata wins.
    pub fn with_providers(
        state: PopupHostState,
        registry: Arc<PopupRegistry>,
        providers: Vec<Box<dyn PopupFactoryProvider>>,
    ) -> Self {
        let observer = state.subscribe();
        Self {
            state,
            observer,
            registry,
            providers,
            resolved: None,
        }
    }

    /// Whether a popup is currently pending; input should be routed here
    /// first while this holds.
    pub fn is_active(&self) -> bool {
        self.state.is_showing()
    }

    /// Completes when the slot publishes or clears a request. Drive
    /// redraws from this in `select!`-style event loops.
    pub async fn changed(&mut self) {
        // Fails only once the state is dropped; no change can follow that.
        let _ = self.observer.changed().await;
    }

    /// Draw the pending popup, if any, over `area`.
    ///
    /// With no pending request this draws nothing. With a pending request
    /// whose metadata no provider claims, this also draws nothing: the
    /// request stays pending and the caller stays suspended, which is
    /// logged as a warning once per request.
    ///
    /// # Panics
    ///
    /// Panics when the pending identity has no registration. Showing an
    /// unregistered popup is a programming error, not a runtime state.
    pub fn render(&mut self, frame: &mut Frame<'_>, area: Rect, theme: &PopupTheme) {
        self.sync();
        let Some(resolved) = &self.resolved else { return };
        let Some(factory) = &resolved.factory else { return };
        factory.render(&resolved.entry, frame, area, theme, &resolved.scope);
    }

    /// Route a key press to the pending popup's chrome.
    ///
    /// Returns `true` when the event was consumed. Always `false` while no
    /// popup is pending, or when pending metadata matched no chrome.
    ///
    /// # Panics
    ///
    /// As for [`render`](Self::render).
    pub fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        self.sync();
        let Some(resolved) = &self.resolved else {
            return false;
        };
        let Some(factory) = &resolved.factory else {
            return false;
        };
        factory.handle_key(&resolved.entry, key, &resolved.scope)
    }

    /// Refresh the cached resolution against the slot.
    fn sync(&mut self) {
        let pending = self.observer.borrow_and_update().clone();
        let Some(pending) = pending else {
            self.resolved = None;
            return;
        };
        if let Some(resolved) = &self.resolved {
            if resolved.pending.same_request(&pending) {
                return;
            }
        }

        let entry = match self.registry.entry_for(pending.id_arc()) {
            Ok(entry) => entry,
            Err(err) => panic!("popup host: {err}"),
        };
        let factory = self
            .providers
            .iter()
            .find_map(|provider| provider.create(&entry));
        if factory.is_none() {
            warn!(
                "no popup factory matched metadata for {:?}; request stays pending",
                entry.id()
            );
        }
        let scope = FactoryScope::new(self.state.clone(), pending.clone());
        self.resolved = Some(ResolvedPopup {
            pending,
            entry,
            factory,
            scope,
        });
    }
}
