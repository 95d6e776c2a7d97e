//! Registry entries and typed popup content

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::layout::Rect;

use crate::factory::FactoryScope;
use crate::id::{Popup, PopupKey};
use crate::metadata::Metadata;
use crate::theme::PopupTheme;
use crate::Frame;

/// Typed popup content: draws the interaction for identity type `P` and
/// reports the user's decision through the responder.
///
/// Implemented directly for render-only closures; implement the trait on a
/// struct when the content also reacts to keys.
pub trait PopupContent<P: Popup>: Send + Sync + 'static {
    /// Draw the content inside the area the chrome allotted.
    fn render(
        &self,
        popup: &P,
        frame: &mut Frame<'_>,
        area: Rect,
        theme: &PopupTheme,
        responder: &PopupResponder<'_, P::Output>,
    );

    /// Keyboard input while this popup is front-most. Return `true` when
    /// the event was consumed. Chrome-level keys (Esc) never reach here.
    fn handle_key(
        &self,
        popup: &P,
        key: KeyEvent,
        responder: &PopupResponder<'_, P::Output>,
    ) -> bool {
        let _ = (popup, key, responder);
        false
    }
}

impl<P, F> PopupContent<P> for F
where
    P: Popup,
    F: Fn(&P, &mut Frame<'_>, Rect, &PopupTheme, &PopupResponder<'_, P::Output>)
        + Send
        + Sync
        + 'static,
{
    fn render(
        &self,
        popup: &P,
        frame: &mut Frame<'_>,
        area: Rect,
        theme: &PopupTheme,
        responder: &PopupResponder<'_, P::Output>,
    ) {
        self(popup, frame, area, theme, responder);
    }
}

/// Typed resolution surface handed to content while it is on screen.
pub struct PopupResponder<'a, R> {
    scope: &'a FactoryScope,
    _result: PhantomData<fn(R)>,
}

impl<'a, R: Send + 'static> PopupResponder<'a, R> {
    pub(crate) fn new(scope: &'a FactoryScope) -> Self {
        Self {
            scope,
            _result: PhantomData,
        }
    }

    /// Resolve the popup with `value`; the suspended
    /// [`show`](crate::PopupHostState::show) caller resumes with
    /// `Some(value)`.
    pub fn respond(&self, value: R) {
        self.scope.perform_action(Box::new(value));
    }

    /// Resolve the popup with no value.
    pub fn dismiss(&self) {
        self.scope.request_dismiss();
    }
}

/// Object-safe face of [`PopupContent`] as stored in the registry.
pub(crate) trait ErasedContent: Send + Sync {
    fn render(
        &self,
        id: &dyn PopupKey,
        frame: &mut Frame<'_>,
        area: Rect,
        theme: &PopupTheme,
        scope: &FactoryScope,
    );

    fn handle_key(&self, id: &dyn PopupKey, key: KeyEvent, scope: &FactoryScope) -> bool;
}

pub(crate) struct ContentAdapter<P, C> {
    content: C,
    _popup: PhantomData<fn(P)>,
}

impl<P, C> ContentAdapter<P, C> {
    pub(crate) fn new(content: C) -> Self {
        Self {
            content,
            _popup: PhantomData,
        }
    }
}

impl<P: Popup, C: PopupContent<P>> ErasedContent for ContentAdapter<P, C> {
    fn render(
        &self,
        id: &dyn PopupKey,
        frame: &mut Frame<'_>,
        area: Rect,
        theme: &PopupTheme,
        scope: &FactoryScope,
    ) {
        self.content
            .render(downcast_id(id), frame, area, theme, &PopupResponder::new(scope));
    }

    fn handle_key(&self, id: &dyn PopupKey, key: KeyEvent, scope: &FactoryScope) -> bool {
        self.content
            .handle_key(downcast_id(id), key, &PopupResponder::new(scope))
    }
}

// Registration pairs content with identities of type `P` and the registry
// only routes matching identities here, so the downcast cannot fail for a
// correctly built registry.
fn downcast_id<P: Popup>(id: &dyn PopupKey) -> &P {
    id.as_any()
        .downcast_ref::<P>()
        .expect("popup identity type does not match its registered content")
}

/// The resolved (identity, metadata, content) triple for one popup, minted
/// on demand by the registry.
#[derive(Clone)]
pub struct PopupEntry {
    id: Arc<dyn PopupKey>,
    metadata: Arc<Metadata>,
    content: Arc<dyn ErasedContent>,
}

impl PopupEntry {
    pub(crate) fn new(
        id: Arc<dyn PopupKey>,
        metadata: Arc<Metadata>,
        content: Arc<dyn ErasedContent>,
    ) -> Self {
        Self {
            id,
            metadata,
            content,
        }
    }

    /// The identity this entry renders.
    pub fn id(&self) -> &dyn PopupKey {
        self.id.as_ref()
    }

    /// Chrome-selection metadata attached at registration.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Draw the entry's own content, without chrome.
    pub fn render(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        theme: &PopupTheme,
        scope: &FactoryScope,
    ) {
        self.content.render(self.id.as_ref(), frame, area, theme, scope);
    }

    /// Route a key press into the entry's content.
    pub fn handle_key(&self, key: KeyEvent, scope: &FactoryScope) -> bool {
        self.content.handle_key(self.id.as_ref(), key, scope)
    }
}

impl PartialEq for PopupEntry {
    // Structural over identity and metadata; content compares by function
    // identity.
    fn eq(&self, other: &Self) -> bool {
        self.id.dyn_eq(other.id.as_ref())
            && self.metadata.as_ref() == other.metadata.as_ref()
            && Arc::ptr_eq(&self.content, &other.content)
    }
}

impl fmt::Debug for PopupEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopupEntry")
            .field("id", &self.id)
            .field("metadata", &self.metadata)
            .finish()
    }
}
