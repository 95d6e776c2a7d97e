//! Chrome selection and the resolution scope handed to chrome

use std::any::Any;

use crossterm::event::KeyEvent;
use ratatui::layout::Rect;

use crate::registry::PopupEntry;
use crate::state::{PendingPopup, PopupHostState};
use crate::theme::PopupTheme;
use crate::Frame;

/// Dismiss/action callbacks bound to one pending request.
///
/// Chrome and content resolve the popup exclusively through this scope;
/// the slot itself is never mutated from the render side by any other
/// path. A scope that outlives its request becomes a no-op.
#[derive(Clone)]
pub struct FactoryScope {
    state: PopupHostState,
    pending: PendingPopup,
}

impl FactoryScope {
    pub(crate) fn new(state: PopupHostState, pending: PendingPopup) -> Self {
        Self { state, pending }
    }

    /// The user backed out without choosing: resolve with no value.
    pub fn request_dismiss(&self) {
        self.state.finish(&self.pending, None);
    }

    /// The user produced `action`: resolve with it. The suspended caller
    /// downcasts to the result type its identity declared.
    pub fn perform_action(&self, action: Box<dyn Any + Send>) {
        self.state.finish(&self.pending, Some(action));
    }
}

/// A chrome wrapper around one entry's content.
///
/// The factory owns the container: backdrop, placement, border and
/// chrome-level keys. The visible interaction stays with the entry, which
/// the factory delegates to.
pub trait PopupFactory: Send + Sync {
    /// Draw chrome and content for `entry` over the host area.
    fn render(
        &self,
        entry: &PopupEntry,
        frame: &mut Frame<'_>,
        area: Rect,
        theme: &PopupTheme,
        scope: &FactoryScope,
    );

    /// Chrome-level key routing. Return `true` when the event was
    /// consumed.
    fn handle_key(&self, entry: &PopupEntry, key: KeyEvent, scope: &FactoryScope) -> bool;
}

/// Capability interface for adding chrome types without touching the core.
///
/// A provider inspects an entry's metadata (each chrome owns one reserved
/// key) and either produces the factory for it or declines. The host asks
/// its providers in list order and takes the first factory offered; later
/// providers are not consulted.
pub trait PopupFactoryProvider: Send + Sync {
    fn create(&self, entry: &PopupEntry) -> Option<Box<dyn PopupFactory>>;
}
